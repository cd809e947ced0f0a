use dioxus::prelude::*;

use bkmart_domain::{self as domain, LocationService};

use crate::{
    DOMAIN_SERVICE,
    component::{
        element::Loading,
        form::{InputField, SelectField, SelectOption},
    },
};

/// Editable delivery address with cascading province, district and ward selection.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AddressFields {
    pub name: String,
    pub phone: String,
    pub detail: String,
    pub picker: domain::AddressPicker,
}

impl AddressFields {
    pub fn from_address(address: Option<&domain::Address>) -> Self {
        match address {
            Some(address) => Self {
                name: address.name.clone(),
                phone: address.phone.clone(),
                detail: address.detail.clone(),
                picker: domain::AddressPicker::from_address(address),
            },
            None => Self::default(),
        }
    }

    /// Shipping destination of the current selection, once district and ward are chosen.
    pub fn destination(&self) -> Option<domain::Destination> {
        self.picker.destination()
    }

    pub fn to_input(&self) -> Result<domain::AddressInput, String> {
        let Some(ward_code) = self.picker.ward() else {
            return Err("Please select province, district and ward".to_string());
        };
        if self.name.trim().is_empty() || self.phone.trim().is_empty() {
            return Err("Please enter recipient name and phone number".to_string());
        }
        Ok(domain::AddressInput {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address_detail: self.detail.trim().to_string(),
            ward_code: ward_code.to_string(),
        })
    }
}

#[component]
pub fn AddressForm(fields: Signal<AddressFields>) -> Element {
    let provinces = use_resource(|| async { DOMAIN_SERVICE.read().get_provinces().await });
    let districts = use_resource(move || async move {
        let province = fields.read().picker.province().map(str::to_string);
        match province {
            Some(code) => DOMAIN_SERVICE.read().get_districts(&code).await,
            None => Ok(vec![]),
        }
    });
    let wards = use_resource(move || async move {
        let district = fields.read().picker.district().map(str::to_string);
        match district {
            Some(code) => DOMAIN_SERVICE.read().get_wards(&code).await,
            None => Ok(vec![]),
        }
    });

    let current = fields.read().clone();

    rsx! {
        InputField {
            label: "Recipient".to_string(),
            value: current.name.clone(),
            has_changed: false,
            oninput: move |evt: FormEvent| fields.write().name = evt.value(),
        }
        InputField {
            label: "Phone".to_string(),
            r#type: "tel".to_string(),
            value: current.phone.clone(),
            has_changed: false,
            oninput: move |evt: FormEvent| fields.write().phone = evt.value(),
        }
        InputField {
            label: "Street address".to_string(),
            value: current.detail.clone(),
            has_changed: false,
            oninput: move |evt: FormEvent| fields.write().detail = evt.value(),
        }
        DivisionSelect {
            label: "Province",
            divisions: loaded(&provinces.read()),
            selected: current.picker.province().map(str::to_string),
            onchange: move |code: String| fields.write().picker.select_province(&code),
        }
        DivisionSelect {
            label: "District",
            divisions: loaded(&districts.read()),
            selected: current.picker.district().map(str::to_string),
            onchange: move |code: String| fields.write().picker.select_district(&code),
        }
        DivisionSelect {
            label: "Ward",
            divisions: loaded(&wards.read()),
            selected: current.picker.ward().map(str::to_string),
            onchange: move |code: String| fields.write().picker.select_ward(&code),
        }
    }
}

fn loaded(
    divisions: &Option<Result<Vec<domain::Division>, domain::ReadError>>,
) -> Option<Result<Vec<domain::Division>, String>> {
    divisions.as_ref().map(|result| match result {
        Ok(divisions) => Ok(divisions.clone()),
        Err(err) => Err(err.to_string()),
    })
}

#[component]
fn DivisionSelect(
    label: String,
    divisions: Option<Result<Vec<domain::Division>, String>>,
    selected: Option<String>,
    onchange: EventHandler<String>,
) -> Element {
    match divisions {
        Some(Ok(divisions)) => {
            let selected = selected.unwrap_or_default();
            let mut options = vec![rsx! {
                SelectOption { text: "Select {label.to_lowercase()}", value: "", selected: selected.is_empty() }
            }];
            options.extend(divisions.into_iter().map(|d| {
                let is_selected = d.code == selected;
                rsx! {
                    SelectOption { text: d.full_name, value: d.code, selected: is_selected }
                }
            }));
            rsx! {
                SelectField {
                    label,
                    options,
                    has_changed: false,
                    onchange: move |evt: FormEvent| onchange.call(evt.value()),
                }
            }
        }
        Some(Err(err)) => rsx! {
            p { class: "help is-danger", "Failed to get {label.to_lowercase()} list: {err}" }
        },
        None => rsx! { Loading {} },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_address_fields_to_input() {
        let mut fields = AddressFields {
            name: " An ".to_string(),
            phone: "0123".to_string(),
            detail: "1 Dai Co Viet".to_string(),
            picker: domain::AddressPicker::default(),
        };
        assert!(fields.to_input().is_err());

        fields.picker.select_province("01");
        fields.picker.select_district("001");
        fields.picker.select_ward("00001");
        assert_eq!(
            fields.to_input(),
            Ok(domain::AddressInput {
                name: "An".to_string(),
                phone: "0123".to_string(),
                address_detail: "1 Dai Co Viet".to_string(),
                ward_code: "00001".to_string(),
            })
        );
    }

    #[test]
    fn test_address_fields_destination_follows_edits() {
        let saved = domain::Address {
            name: "An".to_string(),
            phone: "0123".to_string(),
            detail: "1 Dai Co Viet".to_string(),
            province: Some(domain::Division {
                code: "01".to_string(),
                full_name: "Ha Noi".to_string(),
            }),
            district: Some(domain::Division {
                code: "001".to_string(),
                full_name: "Ba Dinh".to_string(),
            }),
            ward: Some(domain::Division {
                code: "00001".to_string(),
                full_name: "Phuc Xa".to_string(),
            }),
        };
        let mut fields = AddressFields::from_address(Some(&saved));
        assert_eq!(fields.destination(), saved.destination());

        fields.picker.select_province("79");
        assert_eq!(fields.destination(), None);

        fields.picker.select_district("760");
        fields.picker.select_ward("26734");
        assert_eq!(
            fields.destination(),
            Some(domain::Destination {
                district_code: "760".to_string(),
                ward_code: "26734".to_string(),
            })
        );
        assert_ne!(fields.destination(), saved.destination());
    }
}
