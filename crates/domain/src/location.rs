use std::fmt;

use crate::ReadError;

#[allow(async_fn_in_trait)]
pub trait LocationService {
    async fn get_provinces(&self) -> Result<Vec<Province>, ReadError>;
    async fn get_districts(&self, province_code: &str) -> Result<Vec<District>, ReadError>;
    async fn get_wards(&self, district_code: &str) -> Result<Vec<Ward>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait LocationRepository {
    async fn read_provinces(&self) -> Result<Vec<Province>, ReadError>;
    async fn read_districts(&self, province_code: &str) -> Result<Vec<District>, ReadError>;
    async fn read_wards(&self, district_code: &str) -> Result<Vec<Ward>, ReadError>;
}

/// An administrative division identified by its code.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Division {
    pub code: String,
    pub full_name: String,
}

pub type Province = Division;
pub type District = Division;
pub type Ward = Division;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Address {
    pub name: String,
    pub phone: String,
    pub detail: String,
    pub ward: Option<Ward>,
    pub district: Option<District>,
    pub province: Option<Province>,
}

impl Address {
    /// Codes used for shipping fee lookups, if both ward and district are known.
    #[must_use]
    pub fn destination(&self) -> Option<Destination> {
        match (&self.district, &self.ward) {
            (Some(district), Some(ward)) if !district.code.is_empty() && !ward.code.is_empty() => {
                Some(Destination {
                    district_code: district.code.clone(),
                    ward_code: ward.code.clone(),
                })
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn to_input(&self) -> AddressInput {
        AddressInput {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address_detail: self.detail.clone(),
            ward_code: self
                .ward
                .as_ref()
                .map(|ward| ward.code.clone())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts = [
            Some(self.detail.as_str()),
            self.ward.as_ref().map(|d| d.full_name.as_str()),
            self.district.as_ref().map(|d| d.full_name.as_str()),
            self.province.as_ref().map(|d| d.full_name.as_str()),
        ];
        let parts = parts
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join(", "))
    }
}

/// Address as sent to the backend, which resolves the divisions from the ward code.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddressInput {
    pub name: String,
    pub phone: String,
    pub address_detail: String,
    pub ward_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub district_code: String,
    pub ward_code: String,
}

/// Cascading province, district and ward selection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddressPicker {
    province: Option<String>,
    district: Option<String>,
    ward: Option<String>,
}

impl AddressPicker {
    #[must_use]
    pub fn from_address(address: &Address) -> Self {
        let code = |division: &Option<Division>| {
            division
                .as_ref()
                .map(|d| d.code.clone())
                .filter(|c| !c.is_empty())
        };
        Self {
            province: code(&address.province),
            district: code(&address.district),
            ward: code(&address.ward),
        }
    }

    pub fn select_province(&mut self, code: &str) {
        self.province = non_empty(code);
        self.district = None;
        self.ward = None;
    }

    pub fn select_district(&mut self, code: &str) {
        self.district = non_empty(code);
        self.ward = None;
    }

    pub fn select_ward(&mut self, code: &str) {
        self.ward = non_empty(code);
    }

    #[must_use]
    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    #[must_use]
    pub fn district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    #[must_use]
    pub fn ward(&self) -> Option<&str> {
        self.ward.as_deref()
    }

    #[must_use]
    pub fn destination(&self) -> Option<Destination> {
        Some(Destination {
            district_code: self.district.clone()?,
            ward_code: self.ward.clone()?,
        })
    }
}

fn non_empty(code: &str) -> Option<String> {
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn division(code: &str, full_name: &str) -> Division {
        Division {
            code: code.to_string(),
            full_name: full_name.to_string(),
        }
    }

    fn address() -> Address {
        Address {
            name: "Alice".to_string(),
            phone: "0123456789".to_string(),
            detail: "1 Dai Co Viet".to_string(),
            ward: Some(division("1A0607", "Bach Khoa")),
            district: Some(division("1488", "Hai Ba Trung")),
            province: Some(division("201", "Ha Noi")),
        }
    }

    #[test]
    fn test_address_display() {
        assert_eq!(
            address().to_string(),
            "1 Dai Co Viet, Bach Khoa, Hai Ba Trung, Ha Noi"
        );
        assert_eq!(
            Address {
                ward: None,
                ..address()
            }
            .to_string(),
            "1 Dai Co Viet, Hai Ba Trung, Ha Noi"
        );
        assert_eq!(Address::default().to_string(), "");
    }

    #[test]
    fn test_address_destination() {
        assert_eq!(
            address().destination(),
            Some(Destination {
                district_code: "1488".to_string(),
                ward_code: "1A0607".to_string(),
            })
        );
        assert_eq!(
            Address {
                ward: None,
                ..address()
            }
            .destination(),
            None
        );
    }

    #[test]
    fn test_address_to_input() {
        assert_eq!(
            address().to_input(),
            AddressInput {
                name: "Alice".to_string(),
                phone: "0123456789".to_string(),
                address_detail: "1 Dai Co Viet".to_string(),
                ward_code: "1A0607".to_string(),
            }
        );
    }

    #[test]
    fn test_address_picker_cascade() {
        let mut picker = AddressPicker::from_address(&address());
        assert_eq!(picker.province(), Some("201"));
        assert_eq!(picker.district(), Some("1488"));
        assert_eq!(picker.ward(), Some("1A0607"));

        picker.select_district("1490");
        assert_eq!(picker.province(), Some("201"));
        assert_eq!(picker.district(), Some("1490"));
        assert_eq!(picker.ward(), None);
        assert_eq!(picker.destination(), None);

        picker.select_ward("1B0101");
        assert_eq!(
            picker.destination(),
            Some(Destination {
                district_code: "1490".to_string(),
                ward_code: "1B0101".to_string(),
            })
        );

        picker.select_province("202");
        assert_eq!(picker.province(), Some("202"));
        assert_eq!(picker.district(), None);
        assert_eq!(picker.ward(), None);

        picker.select_province("");
        assert_eq!(picker, AddressPicker::default());
    }
}
