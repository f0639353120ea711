use serde::{Deserialize, Serialize};

/// One entry of the station dropdown: display name, CRS code, and the
/// coordinates used for the map markers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub name: String,
    pub code: String,
    pub lat: f64,
    pub lon: f64,
}

/// Static name <-> CRS code mapping for the stations the dashboard offers.
pub struct StationRegistry {
    stations: Vec<Station>,
}

impl StationRegistry {
    pub fn new() -> Self {
        let stations = STATIONS
            .iter()
            .map(|&(name, code, lat, lon)| Station {
                name: name.to_string(),
                code: code.to_string(),
                lat,
                lon,
            })
            .collect();

        Self { stations }
    }

    pub fn all(&self) -> &[Station] {
        &self.stations
    }

    pub fn by_code(&self, code: &str) -> Option<&Station> {
        self.stations
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(code))
    }

    pub fn by_name(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == name)
    }
}

impl Default for StationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

const STATIONS: &[(&str, &str, f64, f64)] = &[
    ("London Waterloo", "WAT", 51.5031, -0.1132),
    ("London Paddington", "PAD", 51.5154, -0.1755),
    ("London Euston", "EUS", 51.5282, -0.1337),
    ("London Victoria", "VIC", 51.4952, -0.1441),
    ("London Kings Cross", "KGX", 51.5308, -0.1238),
    ("London Liverpool Street", "LST", 51.5178, -0.0823),
    ("London Bridge", "LBG", 51.5049, -0.0863),
    ("Manchester Piccadilly", "MAN", 53.4774, -2.2309),
    ("Birmingham New Street", "BHM", 52.4778, -1.8985),
    ("Edinburgh Waverley", "EDB", 55.9521, -3.1890),
    ("Glasgow Central", "GLC", 55.8589, -4.2579),
    ("Leeds", "LDS", 53.7947, -1.5479),
    ("Bristol Temple Meads", "BRI", 51.4491, -2.5813),
    ("Cardiff Central", "CDF", 51.4761, -3.1794),
    ("Liverpool Lime Street", "LIV", 53.4077, -2.9776),
    ("Newcastle", "NCL", 54.9683, -1.6178),
    ("Nottingham", "NOT", 52.9470, -1.1464),
    ("Sheffield", "SHF", 53.3780, -1.4621),
    ("Southampton Central", "SOU", 50.9075, -1.4138),
    ("Reading", "RDG", 51.4586, -0.9719),
    ("Brighton", "BTN", 50.8290, -0.1412),
    ("York", "YRK", 53.9576, -1.0933),
    ("Oxford", "OXF", 51.7534, -1.2699),
    ("Cambridge", "CBG", 52.1943, 0.1371),
    ("Leicester", "LEI", 52.6276, -1.1251),
    ("Norwich", "NRW", 52.6271, 1.3066),
    ("Exeter St Davids", "EXD", 50.7292, -3.5434),
    ("Plymouth", "PLY", 50.3776, -4.1432),
];
