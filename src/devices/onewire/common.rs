use anyhow::{Context, Error, ensure};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str};

// 64-bit factory-lasered ROM code of a 1-wire slave. Byte 0 is the
// family code, byte 7 the bus-level crc. Compared byte-wise.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DeviceAddress([u8; Self::LENGTH]);
impl DeviceAddress {
    pub const LENGTH: usize = 8;

    pub fn new(address: [u8; Self::LENGTH]) -> Self {
        Self(address)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }
    pub fn family_code(&self) -> u8 {
        self.0[0]
    }
}
impl str::FromStr for DeviceAddress {
    type Err = Error;

    // lowercase colon separated hexadecimal octets, eg.
    // 28:ff:64:1e:04:17:03:5f
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups = s.split(':').collect::<Vec<_>>();
        ensure!(
            groups.len() == Self::LENGTH,
            "expected {} colon separated groups",
            Self::LENGTH
        );

        let mut address = [0u8; Self::LENGTH];
        for (byte, group) in address.iter_mut().zip(groups) {
            ensure!(
                group.len() == 2 && group.bytes().all(|character| character.is_ascii_hexdigit()),
                "expected two digit hexadecimal octet, got {:?}",
                group
            );
            *byte = u8::from_str_radix(group, 16).context("from_str_radix")?;
        }

        Ok(Self(address))
    }
}
impl fmt::Display for DeviceAddress {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|byte| format!("{byte:02x}")).join(":")
        )
    }
}
impl Serialize for DeviceAddress {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> Deserialize<'de> for DeviceAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        let self_ = string.parse().map_err(serde::de::Error::custom)?;
        Ok(self_)
    }
}
