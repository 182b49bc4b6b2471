//! Typed records for the six flat-file kinds
//!
//! Each constructor takes the raw pipe-split field vector for one line,
//! record-type tag still in position 0, and maps positional fields into a
//! named struct. Numeric coercion is lenient: blank, whitespace-only, or
//! unparsable values become None rather than failing the record. A line
//! below its kind's minimum field count, or one without a usable unique
//! system identifier, is rejected with a typed skip reason.

use super::{RecordKind, SkipReason, SourceKind};

/// Trimmed text field; blank becomes None
fn text_at(fields: &[&str], idx: usize) -> Option<String> {
    fields
        .get(idx)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Real-valued field; blank or unparsable becomes None
fn real_at(fields: &[&str], idx: usize) -> Option<f64> {
    fields.get(idx).and_then(|v| v.trim().parse::<f64>().ok())
}

/// Integer field; blank or unparsable becomes None
fn int_at(fields: &[&str], idx: usize) -> Option<i64> {
    fields.get(idx).and_then(|v| v.trim().parse::<i64>().ok())
}

/// Sequential reader over a field vector.
///
/// Most record kinds map fields in file order; the cursor keeps the offset
/// table readable as one declaration per column.
struct FieldCursor<'a> {
    fields: &'a [&'a str],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    fn new(fields: &'a [&'a str], start: usize) -> Self {
        Self { fields, pos: start }
    }

    fn text(&mut self) -> Option<String> {
        let value = text_at(self.fields, self.pos);
        self.pos += 1;
        value
    }

    fn real(&mut self) -> Option<f64> {
        let value = real_at(self.fields, self.pos);
        self.pos += 1;
        value
    }

    fn int(&mut self) -> Option<i64> {
        let value = int_at(self.fields, self.pos);
        self.pos += 1;
        value
    }
}

/// `HD` — one authorization header record (58 data columns)
#[derive(Debug, Clone, Default)]
pub struct LicenseRecord {
    pub unique_system_identifier: String,
    pub uls_file_number: Option<String>,
    pub ebf_number: Option<String>,
    pub call_sign: Option<String>,
    pub license_status: Option<String>,
    pub radio_service_type: Option<String>,
    pub grant_date: Option<String>,
    pub expired_date: Option<String>,
    pub cancellation_date: Option<String>,
    pub eligibility_rule_num: Option<String>,
    pub applicant_type_code: Option<String>,
    pub alien: Option<String>,
    pub alien_government: Option<String>,
    pub alien_corporation: Option<String>,
    pub alien_officer: Option<String>,
    pub alien_control: Option<String>,
    pub revoked: Option<String>,
    pub convicted: Option<String>,
    pub adjudged: Option<String>,
    pub involved_reserved: Option<String>,
    pub common_carrier: Option<String>,
    pub non_common_carrier: Option<String>,
    pub private_comm: Option<String>,
    pub fixed: Option<String>,
    pub mobile: Option<String>,
    pub radiolocation: Option<String>,
    pub satellite: Option<String>,
    pub developmental_or_sta: Option<String>,
    pub interconnected_service: Option<String>,
    pub certifier_first_name: Option<String>,
    pub certifier_mi: Option<String>,
    pub certifier_last_name: Option<String>,
    pub certifier_suffix: Option<String>,
    pub certifier_title: Option<String>,
    pub gender: Option<String>,
    pub african_american: Option<String>,
    pub native_american: Option<String>,
    pub hawaiian: Option<String>,
    pub asian: Option<String>,
    pub white: Option<String>,
    pub ethnicity: Option<String>,
    pub effective_date: Option<String>,
    pub last_action_date: Option<String>,
    pub auction_id: Option<String>,
    pub reg_stat_broad_serv: Option<String>,
    pub band_manager: Option<String>,
    pub type_serv_broad_serv: Option<String>,
    pub alien_ruling: Option<String>,
    pub licensee_name_change: Option<String>,
    pub whitespace_ind: Option<String>,
    pub additional_cert_choice: Option<String>,
    pub additional_cert_answer: Option<String>,
    pub discontinuation_ind: Option<String>,
    pub regulatory_compliance_ind: Option<String>,
    pub eligibility_cert_900: Option<String>,
    pub transition_plan_cert_900: Option<String>,
    pub return_spectrum_cert_900: Option<String>,
    pub payment_cert_900: Option<String>,
}

impl LicenseRecord {
    pub fn from_fields(fields: &[&str]) -> Result<Self, SkipReason> {
        if fields.len() < RecordKind::License.min_fields() {
            return Err(SkipReason::TooFewFields);
        }
        let mut f = FieldCursor::new(fields, 1);
        let unique_system_identifier = f.text().ok_or(SkipReason::MissingIdentifier)?;

        Ok(Self {
            unique_system_identifier,
            uls_file_number: f.text(),
            ebf_number: f.text(),
            call_sign: f.text(),
            license_status: f.text(),
            radio_service_type: f.text(),
            grant_date: f.text(),
            expired_date: f.text(),
            cancellation_date: f.text(),
            eligibility_rule_num: f.text(),
            applicant_type_code: f.text(),
            alien: f.text(),
            alien_government: f.text(),
            alien_corporation: f.text(),
            alien_officer: f.text(),
            alien_control: f.text(),
            revoked: f.text(),
            convicted: f.text(),
            adjudged: f.text(),
            involved_reserved: f.text(),
            common_carrier: f.text(),
            non_common_carrier: f.text(),
            private_comm: f.text(),
            fixed: f.text(),
            mobile: f.text(),
            radiolocation: f.text(),
            satellite: f.text(),
            developmental_or_sta: f.text(),
            interconnected_service: f.text(),
            certifier_first_name: f.text(),
            certifier_mi: f.text(),
            certifier_last_name: f.text(),
            certifier_suffix: f.text(),
            certifier_title: f.text(),
            gender: f.text(),
            african_american: f.text(),
            native_american: f.text(),
            hawaiian: f.text(),
            asian: f.text(),
            white: f.text(),
            ethnicity: f.text(),
            effective_date: f.text(),
            last_action_date: f.text(),
            auction_id: f.text(),
            reg_stat_broad_serv: f.text(),
            band_manager: f.text(),
            type_serv_broad_serv: f.text(),
            alien_ruling: f.text(),
            licensee_name_change: f.text(),
            whitespace_ind: f.text(),
            additional_cert_choice: f.text(),
            additional_cert_answer: f.text(),
            discontinuation_ind: f.text(),
            regulatory_compliance_ind: f.text(),
            eligibility_cert_900: f.text(),
            transition_plan_cert_900: f.text(),
            return_spectrum_cert_900: f.text(),
            payment_cert_900: f.text(),
        })
    }

    /// True when the record supplies neither a grant date nor an
    /// expiration date; such records cannot improve a settled license row.
    pub fn has_no_dates(&self) -> bool {
        self.grant_date.is_none() && self.expired_date.is_none()
    }
}

/// `EN` — one name/address/role record (29 data columns)
#[derive(Debug, Clone, Default)]
pub struct EntityRecord {
    pub unique_system_identifier: String,
    pub uls_file_number: Option<String>,
    pub ebf_number: Option<String>,
    pub call_sign: Option<String>,
    pub entity_type: Option<String>,
    pub licensee_id: Option<String>,
    pub entity_name: Option<String>,
    pub first_name: Option<String>,
    pub mi: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub po_box: Option<String>,
    pub attention_line: Option<String>,
    pub sgin: Option<String>,
    pub frn: Option<String>,
    pub applicant_type_code: Option<String>,
    pub applicant_type_other: Option<String>,
    pub status_code: Option<String>,
    pub status_date: Option<String>,
    pub lic_category_code: Option<String>,
    pub linked_license_id: Option<String>,
    pub linked_callsign: Option<String>,
}

impl EntityRecord {
    pub fn from_fields(fields: &[&str]) -> Result<Self, SkipReason> {
        if fields.len() < RecordKind::Entity.min_fields() {
            return Err(SkipReason::TooFewFields);
        }
        let mut f = FieldCursor::new(fields, 1);
        let unique_system_identifier = f.text().ok_or(SkipReason::MissingIdentifier)?;

        Ok(Self {
            unique_system_identifier,
            uls_file_number: f.text(),
            ebf_number: f.text(),
            call_sign: f.text(),
            entity_type: f.text(),
            licensee_id: f.text(),
            entity_name: f.text(),
            first_name: f.text(),
            mi: f.text(),
            last_name: f.text(),
            suffix: f.text(),
            phone: f.text(),
            fax: f.text(),
            email: f.text(),
            street_address: f.text(),
            city: f.text(),
            state: f.text(),
            zip_code: f.text(),
            po_box: f.text(),
            attention_line: f.text(),
            sgin: f.text(),
            frn: f.text(),
            applicant_type_code: f.text(),
            applicant_type_other: f.text(),
            status_code: f.text(),
            status_date: f.text(),
            lic_category_code: f.text(),
            linked_license_id: f.text(),
            linked_callsign: f.text(),
        })
    }
}

/// `FR` — one frequency assignment (16 data columns)
///
/// The two source datasets use incompatible positional layouts for this
/// kind; `from_fields` dispatches on the explicit source tag. Columns not
/// present in either current export layout (upper band, carrier, offset,
/// tolerance) stay in the schema as always-absent.
#[derive(Debug, Clone, Default)]
pub struct FrequencyRecord {
    pub unique_system_identifier: String,
    pub uls_file_number: Option<String>,
    pub ebf_number: Option<String>,
    pub call_sign: Option<String>,
    pub frequency_assigned: Option<f64>,
    pub frequency_upper_band: Option<f64>,
    pub frequency_carrier: Option<f64>,
    pub frequency_offset: Option<f64>,
    pub emission_designator: Option<String>,
    pub power_output: Option<f64>,
    pub power_erp: Option<f64>,
    pub tolerance: Option<f64>,
    pub frequency_number: Option<i64>,
    pub frequency_seq_id: Option<i64>,
    pub status_code: Option<String>,
    pub status_date: Option<String>,
}

impl FrequencyRecord {
    pub fn from_fields(fields: &[&str], source: SourceKind) -> Result<Self, SkipReason> {
        if fields.len() < RecordKind::Frequency.min_fields() {
            return Err(SkipReason::TooFewFields);
        }
        let unique_system_identifier =
            text_at(fields, 1).ok_or(SkipReason::MissingIdentifier)?;

        let record = match source {
            // License export layout:
            // 0:FR 1:usi 2:uls_file_number 3:ebf_number 4:call_sign
            // 5:status_code 6:frequency_number 7:frequency_seq_id
            // 8:emission_designator 10:frequency_assigned 15:power_output
            // 16:power_erp 17:status_date
            SourceKind::Licenses => Self {
                unique_system_identifier,
                uls_file_number: text_at(fields, 2),
                ebf_number: text_at(fields, 3),
                call_sign: text_at(fields, 4),
                frequency_assigned: real_at(fields, 10),
                frequency_upper_band: None,
                frequency_carrier: None,
                frequency_offset: None,
                emission_designator: text_at(fields, 8),
                power_output: real_at(fields, 15),
                power_erp: real_at(fields, 16),
                tolerance: None,
                frequency_number: int_at(fields, 6),
                frequency_seq_id: int_at(fields, 7),
                status_code: text_at(fields, 5),
                status_date: text_at(fields, 17),
            },
            // Application export layout:
            // 0:FR 1:usi 2:application_id (stored as ebf_number)
            // 6:frequency_number 7:frequency_seq_id 8:emission_designator
            // 10:frequency_assigned; no call sign, power, or status fields
            SourceKind::Applications => Self {
                unique_system_identifier,
                uls_file_number: None,
                ebf_number: text_at(fields, 2),
                call_sign: None,
                frequency_assigned: real_at(fields, 10),
                frequency_upper_band: None,
                frequency_carrier: None,
                frequency_offset: None,
                emission_designator: text_at(fields, 8),
                power_output: None,
                power_erp: None,
                tolerance: None,
                frequency_number: int_at(fields, 6),
                frequency_seq_id: int_at(fields, 7),
                status_code: None,
                status_date: None,
            },
        };

        Ok(record)
    }
}

/// `LO` — one site record (50 data columns)
///
/// Coordinates are stored disaggregated (degrees/minutes/seconds plus
/// hemisphere), never pre-converted to decimal degrees.
#[derive(Debug, Clone, Default)]
pub struct LocationRecord {
    pub unique_system_identifier: String,
    pub uls_file_number: Option<String>,
    pub ebf_number: Option<String>,
    pub call_sign: Option<String>,
    pub location_action_performed: Option<String>,
    pub location_type_code: Option<String>,
    pub location_class_code: Option<String>,
    pub location_number: Option<i64>,
    pub site_status: Option<String>,
    pub corresponding_fixed_location: Option<i64>,
    pub location_address: Option<String>,
    pub location_city: Option<String>,
    pub location_county: Option<String>,
    pub location_state: Option<String>,
    pub radius_of_operation: Option<f64>,
    pub area_of_operation_code: Option<String>,
    pub clearance_indicator: Option<String>,
    pub ground_elevation: Option<f64>,
    pub lat_degrees: Option<i64>,
    pub lat_minutes: Option<i64>,
    pub lat_seconds: Option<f64>,
    pub lat_direction: Option<String>,
    pub long_degrees: Option<i64>,
    pub long_minutes: Option<i64>,
    pub long_seconds: Option<f64>,
    pub long_direction: Option<String>,
    pub max_lat_degrees: Option<i64>,
    pub max_lat_minutes: Option<i64>,
    pub max_lat_seconds: Option<f64>,
    pub max_lat_direction: Option<String>,
    pub max_long_degrees: Option<i64>,
    pub max_long_minutes: Option<i64>,
    pub max_long_seconds: Option<f64>,
    pub max_long_direction: Option<String>,
    pub nepa: Option<String>,
    pub quiet_zone_notification_date: Option<String>,
    pub tower_registration_number: Option<String>,
    pub height_of_support_structure: Option<f64>,
    pub overall_height_of_structure: Option<f64>,
    pub structure_type: Option<String>,
    pub airport_id: Option<String>,
    pub location_name: Option<String>,
    pub units_hand_held: Option<String>,
    pub units_mobile: Option<String>,
    pub units_temp_fixed: Option<String>,
    pub units_aircraft: Option<String>,
    pub units_itinerant: Option<String>,
    pub status_code: Option<String>,
    pub status_date: Option<String>,
    pub earth_station_agreement: Option<String>,
}

impl LocationRecord {
    pub fn from_fields(fields: &[&str]) -> Result<Self, SkipReason> {
        if fields.len() < RecordKind::Location.min_fields() {
            return Err(SkipReason::TooFewFields);
        }
        let mut f = FieldCursor::new(fields, 1);
        let unique_system_identifier = f.text().ok_or(SkipReason::MissingIdentifier)?;

        Ok(Self {
            unique_system_identifier,
            uls_file_number: f.text(),
            ebf_number: f.text(),
            call_sign: f.text(),
            location_action_performed: f.text(),
            location_type_code: f.text(),
            location_class_code: f.text(),
            location_number: f.int(),
            site_status: f.text(),
            corresponding_fixed_location: f.int(),
            location_address: f.text(),
            location_city: f.text(),
            location_county: f.text(),
            location_state: f.text(),
            radius_of_operation: f.real(),
            area_of_operation_code: f.text(),
            clearance_indicator: f.text(),
            ground_elevation: f.real(),
            lat_degrees: f.int(),
            lat_minutes: f.int(),
            lat_seconds: f.real(),
            lat_direction: f.text(),
            long_degrees: f.int(),
            long_minutes: f.int(),
            long_seconds: f.real(),
            long_direction: f.text(),
            max_lat_degrees: f.int(),
            max_lat_minutes: f.int(),
            max_lat_seconds: f.real(),
            max_lat_direction: f.text(),
            max_long_degrees: f.int(),
            max_long_minutes: f.int(),
            max_long_seconds: f.real(),
            max_long_direction: f.text(),
            nepa: f.text(),
            quiet_zone_notification_date: f.text(),
            tower_registration_number: f.text(),
            height_of_support_structure: f.real(),
            overall_height_of_structure: f.real(),
            structure_type: f.text(),
            airport_id: f.text(),
            location_name: f.text(),
            units_hand_held: f.text(),
            units_mobile: f.text(),
            units_temp_fixed: f.text(),
            units_aircraft: f.text(),
            units_itinerant: f.text(),
            status_code: f.text(),
            status_date: f.text(),
            earth_station_agreement: f.text(),
        })
    }
}

/// `AN` — one antenna specification (37 data columns, mostly numeric)
#[derive(Debug, Clone, Default)]
pub struct AntennaRecord {
    pub unique_system_identifier: String,
    pub uls_file_number: Option<String>,
    pub ebf_number: Option<String>,
    pub call_sign: Option<String>,
    pub antenna_action_performed: Option<String>,
    pub antenna_number: Option<i64>,
    pub location_number: Option<i64>,
    pub receiver_number: Option<i64>,
    pub antenna_type_code: Option<String>,
    pub height_to_tip: Option<f64>,
    pub height_to_center_raat: Option<f64>,
    pub antenna_make: Option<String>,
    pub antenna_model: Option<String>,
    pub tilt_toward: Option<f64>,
    pub tilt_angle: Option<f64>,
    pub polarization_code: Option<String>,
    pub beamwidth_horiz: Option<f64>,
    pub beamwidth_vert: Option<f64>,
    pub gain: Option<f64>,
    pub azimuth: Option<f64>,
    pub height_above_avg_terrain: Option<f64>,
    pub diversity_height: Option<f64>,
    pub diversity_gain: Option<f64>,
    pub diversity_beam: Option<f64>,
    pub reflector_height: Option<f64>,
    pub reflector_width: Option<f64>,
    pub reflector_separation: Option<f64>,
    pub repeater_height: Option<f64>,
    pub repeater_width: Option<f64>,
    pub repeater_separation: Option<f64>,
    pub commanded_azimuth: Option<f64>,
    pub commanded_elevation: Option<f64>,
    pub twist: Option<f64>,
    pub settle_time: Option<f64>,
    pub comment_text: Option<String>,
    pub status_code: Option<String>,
    pub status_date: Option<String>,
}

impl AntennaRecord {
    pub fn from_fields(fields: &[&str]) -> Result<Self, SkipReason> {
        if fields.len() < RecordKind::Antenna.min_fields() {
            return Err(SkipReason::TooFewFields);
        }
        let mut f = FieldCursor::new(fields, 1);
        let unique_system_identifier = f.text().ok_or(SkipReason::MissingIdentifier)?;

        Ok(Self {
            unique_system_identifier,
            uls_file_number: f.text(),
            ebf_number: f.text(),
            call_sign: f.text(),
            antenna_action_performed: f.text(),
            antenna_number: f.int(),
            location_number: f.int(),
            receiver_number: f.int(),
            antenna_type_code: f.text(),
            height_to_tip: f.real(),
            height_to_center_raat: f.real(),
            antenna_make: f.text(),
            antenna_model: f.text(),
            tilt_toward: f.real(),
            tilt_angle: f.real(),
            polarization_code: f.text(),
            beamwidth_horiz: f.real(),
            beamwidth_vert: f.real(),
            gain: f.real(),
            azimuth: f.real(),
            height_above_avg_terrain: f.real(),
            diversity_height: f.real(),
            diversity_gain: f.real(),
            diversity_beam: f.real(),
            reflector_height: f.real(),
            reflector_width: f.real(),
            reflector_separation: f.real(),
            repeater_height: f.real(),
            repeater_width: f.real(),
            repeater_separation: f.real(),
            commanded_azimuth: f.real(),
            commanded_elevation: f.real(),
            twist: f.real(),
            settle_time: f.real(),
            comment_text: f.text(),
            status_code: f.text(),
            status_date: f.text(),
        })
    }
}

/// `AP` — one filing-purpose record (7 data columns)
#[derive(Debug, Clone, Default)]
pub struct PurposeRecord {
    pub unique_system_identifier: String,
    pub uls_file_number: Option<String>,
    pub ebf_number: Option<String>,
    pub call_sign: Option<String>,
    pub purpose_code: Option<String>,
    pub status_code: Option<String>,
    pub status_date: Option<String>,
}

impl PurposeRecord {
    pub fn from_fields(fields: &[&str]) -> Result<Self, SkipReason> {
        if fields.len() < RecordKind::Purpose.min_fields() {
            return Err(SkipReason::TooFewFields);
        }
        let mut f = FieldCursor::new(fields, 1);
        let unique_system_identifier = f.text().ok_or(SkipReason::MissingIdentifier)?;

        Ok(Self {
            unique_system_identifier,
            uls_file_number: f.text(),
            ebf_number: f.text(),
            call_sign: f.text(),
            purpose_code: f.text(),
            status_code: f.text(),
            status_date: f.text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license_fields(count: usize) -> Vec<String> {
        let mut fields: Vec<String> = (0..count).map(|_| String::new()).collect();
        fields[0] = "HD".to_string();
        fields[1] = "1001".to_string();
        fields[4] = "WQAB123".to_string();
        fields[5] = "A".to_string();
        fields[7] = "20200101".to_string();
        fields[8] = "20300101".to_string();
        fields
    }

    fn as_refs(fields: &[String]) -> Vec<&str> {
        fields.iter().map(String::as_str).collect()
    }

    #[test]
    fn license_below_minimum_is_rejected() {
        let fields = license_fields(40);
        let result = LicenseRecord::from_fields(&as_refs(&fields));
        assert_eq!(result.unwrap_err(), SkipReason::TooFewFields);
    }

    #[test]
    fn license_parses_key_fields() {
        let fields = license_fields(59);
        let record = LicenseRecord::from_fields(&as_refs(&fields)).unwrap();
        assert_eq!(record.unique_system_identifier, "1001");
        assert_eq!(record.call_sign.as_deref(), Some("WQAB123"));
        assert_eq!(record.license_status.as_deref(), Some("A"));
        assert_eq!(record.grant_date.as_deref(), Some("20200101"));
        assert_eq!(record.expired_date.as_deref(), Some("20300101"));
        assert!(record.uls_file_number.is_none());
        assert!(!record.has_no_dates());
    }

    #[test]
    fn license_without_identifier_is_rejected() {
        let mut fields = license_fields(59);
        fields[1] = "   ".to_string();
        let result = LicenseRecord::from_fields(&as_refs(&fields));
        assert_eq!(result.unwrap_err(), SkipReason::MissingIdentifier);
    }

    #[test]
    fn frequency_coercion_is_lenient() {
        let mut fields: Vec<String> = (0..18).map(|_| String::new()).collect();
        fields[0] = "FR".to_string();
        fields[1] = "2002".to_string();
        fields[10] = "  ".to_string(); // whitespace-only: absent, not an error
        let record = FrequencyRecord::from_fields(&as_refs(&fields), SourceKind::Licenses).unwrap();
        assert_eq!(record.frequency_assigned, None);

        fields[10] = "465.0125".to_string();
        fields[6] = "1".to_string();
        fields[7] = "not-a-number".to_string();
        let record = FrequencyRecord::from_fields(&as_refs(&fields), SourceKind::Licenses).unwrap();
        assert_eq!(record.frequency_assigned, Some(465.0125));
        assert_eq!(record.frequency_number, Some(1));
        assert_eq!(record.frequency_seq_id, None);
    }

    #[test]
    fn frequency_layouts_differ_by_source() {
        let mut fields: Vec<String> = (0..18).map(|_| String::new()).collect();
        fields[0] = "FR".to_string();
        fields[1] = "2002".to_string();
        fields[2] = "0004567890".to_string();
        fields[4] = "WQAB123".to_string();
        fields[5] = "A".to_string();
        fields[15] = "50".to_string();
        fields[16] = "100".to_string();

        let lic = FrequencyRecord::from_fields(&as_refs(&fields), SourceKind::Licenses).unwrap();
        assert_eq!(lic.uls_file_number.as_deref(), Some("0004567890"));
        assert_eq!(lic.call_sign.as_deref(), Some("WQAB123"));
        assert_eq!(lic.status_code.as_deref(), Some("A"));
        assert_eq!(lic.power_output, Some(50.0));
        assert_eq!(lic.power_erp, Some(100.0));

        let app =
            FrequencyRecord::from_fields(&as_refs(&fields), SourceKind::Applications).unwrap();
        assert_eq!(app.uls_file_number, None);
        assert_eq!(app.ebf_number.as_deref(), Some("0004567890"));
        assert_eq!(app.call_sign, None);
        assert_eq!(app.status_code, None);
        assert_eq!(app.power_output, None);
    }

    #[test]
    fn location_numeric_fields_are_typed() {
        let mut fields: Vec<String> = (0..51).map(|_| String::new()).collect();
        fields[0] = "LO".to_string();
        fields[1] = "3003".to_string();
        fields[8] = "1".to_string(); // location_number
        fields[18] = "120.5".to_string(); // ground_elevation
        fields[19] = "40".to_string(); // lat_degrees
        fields[20] = "26".to_string(); // lat_minutes
        fields[21] = "46.2".to_string(); // lat_seconds
        fields[22] = "N".to_string(); // lat_direction
        let record = LocationRecord::from_fields(&as_refs(&fields)).unwrap();
        assert_eq!(record.location_number, Some(1));
        assert_eq!(record.ground_elevation, Some(120.5));
        assert_eq!(record.lat_degrees, Some(40));
        assert_eq!(record.lat_minutes, Some(26));
        assert_eq!(record.lat_seconds, Some(46.2));
        assert_eq!(record.lat_direction.as_deref(), Some("N"));
    }

    #[test]
    fn antenna_composite_key_fields_are_integers() {
        let mut fields: Vec<String> = (0..38).map(|_| String::new()).collect();
        fields[0] = "AN".to_string();
        fields[1] = "4004".to_string();
        fields[6] = "2".to_string(); // antenna_number
        fields[7] = "1".to_string(); // location_number
        fields[19] = "9.8".to_string(); // gain
        let record = AntennaRecord::from_fields(&as_refs(&fields)).unwrap();
        assert_eq!(record.antenna_number, Some(2));
        assert_eq!(record.location_number, Some(1));
        assert_eq!(record.gain, Some(9.8));
    }
}
