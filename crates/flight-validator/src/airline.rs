//! Airline and Flight Type Domains

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Airlines accepted by the prediction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Airline {
    GrupoLatam,
    SkyAirline,
    AerolineasArgentinas,
    CopaAir,
    LatinAmericanWings,
    Avianca,
    JetSmartSpa,
    GolTrans,
    AmericanAirlines,
    AirCanada,
    Iberia,
    DeltaAir,
    AirFrance,
    Aeromexico,
    UnitedAirlines,
    OceanairLinhasAereas,
    Alitalia,
    Klm,
    BritishAirways,
    QantasAirways,
    Lacsa,
    Austral,
    PlusUltraLineasAereas,
}

impl Airline {
    /// Every accepted airline
    pub const ALL: [Airline; 23] = [
        Airline::GrupoLatam,
        Airline::SkyAirline,
        Airline::AerolineasArgentinas,
        Airline::CopaAir,
        Airline::LatinAmericanWings,
        Airline::Avianca,
        Airline::JetSmartSpa,
        Airline::GolTrans,
        Airline::AmericanAirlines,
        Airline::AirCanada,
        Airline::Iberia,
        Airline::DeltaAir,
        Airline::AirFrance,
        Airline::Aeromexico,
        Airline::UnitedAirlines,
        Airline::OceanairLinhasAereas,
        Airline::Alitalia,
        Airline::Klm,
        Airline::BritishAirways,
        Airline::QantasAirways,
        Airline::Lacsa,
        Airline::Austral,
        Airline::PlusUltraLineasAereas,
    ];

    /// Name as it appears in the `OPERA` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Airline::GrupoLatam => "Grupo LATAM",
            Airline::SkyAirline => "Sky Airline",
            Airline::AerolineasArgentinas => "Aerolineas Argentinas",
            Airline::CopaAir => "Copa Air",
            Airline::LatinAmericanWings => "Latin American Wings",
            Airline::Avianca => "Avianca",
            Airline::JetSmartSpa => "JetSmart SPA",
            Airline::GolTrans => "Gol Trans",
            Airline::AmericanAirlines => "American Airlines",
            Airline::AirCanada => "Air Canada",
            Airline::Iberia => "Iberia",
            Airline::DeltaAir => "Delta Air",
            Airline::AirFrance => "Air France",
            Airline::Aeromexico => "Aeromexico",
            Airline::UnitedAirlines => "United Airlines",
            Airline::OceanairLinhasAereas => "Oceanair Linhas Aereas",
            Airline::Alitalia => "Alitalia",
            Airline::Klm => "K.L.M.",
            Airline::BritishAirways => "British Airways",
            Airline::QantasAirways => "Qantas Airways",
            Airline::Lacsa => "Lacsa",
            Airline::Austral => "Austral",
            Airline::PlusUltraLineasAereas => "Plus Ultra Lineas Aereas",
        }
    }
}

impl FromStr for Airline {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Airline::ALL.iter().copied().find(|a| a.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Airline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domestic or international flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightType {
    /// `N`
    Domestic,
    /// `I`
    International,
}

impl FlightType {
    /// Code as it appears in the `TIPOVUELO` field
    pub fn code(&self) -> &'static str {
        match self {
            FlightType::Domestic => "N",
            FlightType::International => "I",
        }
    }
}

impl FromStr for FlightType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(FlightType::Domestic),
            "I" => Ok(FlightType::International),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_airline_names_round_trip() {
        for airline in Airline::ALL {
            assert_eq!(airline.as_str().parse::<Airline>(), Ok(airline));
        }
        let names: HashSet<_> = Airline::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(names.len(), 23);
    }

    #[test]
    fn test_airline_is_case_sensitive() {
        assert!("grupo latam".parse::<Airline>().is_err());
        assert!("KLM".parse::<Airline>().is_err());
        assert_eq!("K.L.M.".parse::<Airline>(), Ok(Airline::Klm));
    }

    #[test]
    fn test_flight_type() {
        assert_eq!("N".parse::<FlightType>(), Ok(FlightType::Domestic));
        assert_eq!("I".parse::<FlightType>(), Ok(FlightType::International));
        assert!("O".parse::<FlightType>().is_err());
        assert!("n".parse::<FlightType>().is_err());
        assert_eq!(FlightType::International.code(), "I");
    }
}
