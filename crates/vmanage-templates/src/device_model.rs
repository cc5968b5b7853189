//! Device model identifiers accepted in `deviceType`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! device_models {
    ($($variant:ident => $wire:literal,)+) => {
        /// Device model a feature template applies to.
        ///
        /// Identifiers the controller reports that are not listed here are
        /// kept verbatim in [`DeviceModel::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum DeviceModel {
            $(
                #[doc = concat!("`", $wire, "`")]
                $variant,
            )+
            /// Any other identifier
            Other(String),
        }

        impl DeviceModel {
            /// Every known model.
            pub const KNOWN: &'static [DeviceModel] = &[$(DeviceModel::$variant,)+];

            /// Wire identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(other) => other,
                }
            }
        }

        impl FromStr for DeviceModel {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $($wire => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                })
            }
        }
    };
}

device_models! {
    VedgeCloud => "vedge-cloud",
    Vedge100 => "vedge-100",
    Vedge100B => "vedge-100-B",
    Vedge100M => "vedge-100-M",
    Vedge100Wm => "vedge-100-WM",
    Vedge1000 => "vedge-1000",
    Vedge2000 => "vedge-2000",
    Vedge5000 => "vedge-5000",
    VedgeIsr1100_4G => "vedge-ISR1100-4G",
    VedgeIsr1100_4GLte => "vedge-ISR1100-4GLTE",
    VedgeIsr1100_6G => "vedge-ISR1100-6G",
    VedgeIsr1100X4G => "vedge-ISR1100X-4G",
    VedgeIsr1100X6G => "vedge-ISR1100X-6G",
    VedgeCsr1000V => "vedge-CSR-1000v",
    VedgeC8000V => "vedge-C8000V",
    VedgeC8200_1N4T => "vedge-C8200-1N-4T",
    VedgeC8200L1N4T => "vedge-C8200L-1N-4T",
    VedgeC8300_1N1S4T2X => "vedge-C8300-1N1S-4T2X",
    VedgeC8300_1N1S6T => "vedge-C8300-1N1S-6T",
    VedgeC8300_2N2S4T2X => "vedge-C8300-2N2S-4T2X",
    VedgeC8300_2N2S6T => "vedge-C8300-2N2S-6T",
    VedgeC8500_12X => "vedge-C8500-12X",
    VedgeC8500_12X4Qc => "vedge-C8500-12X4QC",
    VedgeC8500L8S4X => "vedge-C8500L-8S4X",
    VedgeIsr4321 => "vedge-ISR-4321",
    VedgeIsr4331 => "vedge-ISR-4331",
    VedgeIsr4351 => "vedge-ISR-4351",
    VedgeIsr4431 => "vedge-ISR-4431",
    VedgeIsr4451X => "vedge-ISR-4451-X",
    VedgeIsr4461 => "vedge-ISR-4461",
    VedgeIr1101 => "vedge-IR-1101",
    VedgeAsr1001X => "vedge-ASR-1001-X",
    VedgeAsr1002X => "vedge-ASR-1002-X",
    VedgeAsr1001Hx => "vedge-ASR-1001-HX",
    VedgeAsr1002Hx => "vedge-ASR-1002-HX",
    Vsmart => "vsmart",
    Vmanage => "vmanage",
}

impl DeviceModel {
    /// Whether the identifier is one of [`DeviceModel::KNOWN`].
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DeviceModel {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for DeviceModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}
