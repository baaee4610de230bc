//! Resource identifiers and column maps of the Latvian meteorological and
//! hydrological datasets on data.gov.lv.

use crate::types::field_map::FieldMap;
use std::fmt;

pub const API_BASE_URL: &str = "https://data.gov.lv/dati/api/3/action/datastore_search_sql";

/// Datastore resource identifiers.
pub struct ResourceId;

impl ResourceId {
    pub const METEO_OPERATIONAL: &'static str = "17460efb-ae99-4d1d-8144-1068f184b05f";
    pub const METEO_ARCHIVE: &'static str = "339f73e4-20cf-4cea-be65-dcfd4b3b742c";
    pub const METEO_ARCHIVE_AVG: &'static str = "ecc62e27-2071-483c-bca9-5e53d979faa8";
    pub const HYDRO_OPERATIONAL: &'static str = "de5f06e9-6f44-497d-8ec2-72a2483608e8";
    pub const HYDRO_ARCHIVE: &'static str = "a90de53b-e8b6-4cda-97c4-ecb86fbafc2d";
    pub const WEATHER_PHENOMENA_OPERATIONAL: &'static str = "77da5b2b-ebe2-4b94-963d-8a92364a3937";
    pub const WEATHER_PHENOMENA_ARCHIVE: &'static str = "05b4dc26-016c-478a-a5e1-afa74bd83c06";
    pub const METEO_STATIONS: &'static str = "c32c7afd-0d05-44fd-8b24-1de85b4bf11d";
    pub const HYDRO_STATIONS: &'static str = "93fd5e2c-20c4-496e-a920-ff29bda20383";
    pub const METEO_PARAMS: &'static str = "38b462ac-08b9-4168-9d6e-cbaedc2e775d";
    pub const HYDRO_PARAMS: &'static str = "714ab60d-d93e-4403-b76d-2fb865d15d63";
}

/// An observation dataset that can be queried with [`crate::LvMeteo::series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeteoTable {
    /// Dataset title as published on the portal.
    pub name: &'static str,
    /// Datastore resource identifier.
    pub table_name: &'static str,
}

impl MeteoTable {
    pub const METEO_OPERATIONAL: MeteoTable = MeteoTable {
        name: "Meteoroloģiskie operatīvie dati",
        table_name: ResourceId::METEO_OPERATIONAL,
    };
    pub const METEO_ARCHIVE: MeteoTable = MeteoTable {
        name: "Meteoroloģiskie arhīva dati (Faktiskie)",
        table_name: ResourceId::METEO_ARCHIVE,
    };
    pub const METEO_ARCHIVE_AVG: MeteoTable = MeteoTable {
        name: "Meteoroloģiskie arhīva dati (AVG, MIN, MAX)",
        table_name: ResourceId::METEO_ARCHIVE_AVG,
    };
    pub const HYDRO_OPERATIONAL: MeteoTable = MeteoTable {
        name: "Hidroloģiskie operatīvie dati",
        table_name: ResourceId::HYDRO_OPERATIONAL,
    };
    pub const HYDRO_ARCHIVE: MeteoTable = MeteoTable {
        name: "Hidroloģiskie arhīva dati",
        table_name: ResourceId::HYDRO_ARCHIVE,
    };
    pub const WEATHER_PHENOMENA_OPERATIONAL: MeteoTable = MeteoTable {
        name: "Laika parādību operatīvie dati",
        table_name: ResourceId::WEATHER_PHENOMENA_OPERATIONAL,
    };
    pub const WEATHER_PHENOMENA_ARCHIVE: MeteoTable = MeteoTable {
        name: "Laika parādību arhīva dati",
        table_name: ResourceId::WEATHER_PHENOMENA_ARCHIVE,
    };

    pub const ALL: [MeteoTable; 7] = [
        Self::METEO_OPERATIONAL,
        Self::METEO_ARCHIVE,
        Self::METEO_ARCHIVE_AVG,
        Self::HYDRO_OPERATIONAL,
        Self::HYDRO_ARCHIVE,
        Self::WEATHER_PHENOMENA_OPERATIONAL,
        Self::WEATHER_PHENOMENA_ARCHIVE,
    ];
}

impl fmt::Display for MeteoTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.table_name)
    }
}

impl FieldMap {
    /// Columns of the meteorological and hydrological station tables.
    pub fn stations() -> Self {
        FieldMap::new([
            ("station_id", "STATION_ID"),
            ("name", "NAME"),
            ("WMO_id", "WMO_ID"),
            ("begin_date", "BEGIN_DATE"),
            ("end_date", "END_DATE"),
            ("longitude", "GEOGR1"),
            ("latitude", "GEOGR2"),
            ("elevation", "ELEVATION"),
            ("elevation_pressure", "ELEVATION_PRESSURE"),
        ])
    }

    /// Columns of the observation tables; the input of the time-series pivot.
    pub fn observations() -> Self {
        FieldMap::new([
            ("station_id", "STATION_ID"),
            ("param", "ABBREVIATION"),
            ("date", "DATETIME"),
            ("value", "VALUE"),
        ])
    }

    /// Columns of the parameter description tables.
    pub fn parameters() -> Self {
        FieldMap::new([
            ("param_id", "ABBREVIATION"),
            ("description_EN", "EN_DESCRIPTION"),
            ("description_LV", "LV_DESCRIPTION"),
            ("scale", "SCALE"),
            ("lower_limit", "LOWER_LIMIT"),
            ("upper_limit", "UPPER_LIMIT"),
            ("unit", "MEASUREMENT_UNIT"),
        ])
    }
}
