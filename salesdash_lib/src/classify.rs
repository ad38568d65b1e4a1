//! Keyword classification of product names into categories and customer
//! names into retail groups.
//!
//! Both classifiers are total and case-insensitive: names are uppercased once
//! and tested against ordered keyword lists. For products the first matching
//! rule wins; nothing falls through once a rule has matched.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::{SparStrictness, UnmatchedProductPolicy};

/// Product category of a chicken line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Wb,
    DeliWb,
    Fillets,
    Portion,
    VAdd,
    VAddFrozen,
    OffalFresh,
    /// Only produced under `UnmatchedProductPolicy::Other`.
    Other,
}

impl Category {
    /// The seven canonical categories, in report order.
    pub const CANONICAL: [Category; 7] = [
        Category::Wb,
        Category::DeliWb,
        Category::Fillets,
        Category::Portion,
        Category::VAdd,
        Category::VAddFrozen,
        Category::OffalFresh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Wb => "WB",
            Category::DeliWb => "Deli WB",
            Category::Fillets => "Fillets",
            Category::Portion => "Portion",
            Category::VAdd => "V/Add",
            Category::VAddFrozen => "V/Add Frozen",
            Category::OffalFresh => "Offal Fresh",
            Category::Other => "Other",
        }
    }

    /// Categories a breakdown must enumerate under `policy`. `Other` is only
    /// listed when unmatched products can actually land there, so the
    /// breakdown always partitions the rows.
    pub fn reported(policy: UnmatchedProductPolicy) -> Vec<Category> {
        let mut all = Category::CANONICAL.to_vec();
        if policy == UnmatchedProductPolicy::Other {
            all.push(Category::Other);
        }
        all
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Category> {
        let wanted = label.trim();
        Category::CANONICAL
            .iter()
            .chain(std::iter::once(&Category::Other))
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Retail chain a customer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CustomerGroup {
    TakeNPay,
    SparDropShip,
    HyperC,
    PicknPay,
    Mega,
    Dermott,
    Other,
}

impl CustomerGroup {
    /// The six named groups a report breaks sales down by.
    pub const NAMED: [CustomerGroup; 6] = [
        CustomerGroup::TakeNPay,
        CustomerGroup::SparDropShip,
        CustomerGroup::HyperC,
        CustomerGroup::PicknPay,
        CustomerGroup::Mega,
        CustomerGroup::Dermott,
    ];

    pub const ALL: [CustomerGroup; 7] = [
        CustomerGroup::TakeNPay,
        CustomerGroup::SparDropShip,
        CustomerGroup::HyperC,
        CustomerGroup::PicknPay,
        CustomerGroup::Mega,
        CustomerGroup::Dermott,
        CustomerGroup::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CustomerGroup::TakeNPay => "T&Pay",
            CustomerGroup::SparDropShip => "Spar D/Ship",
            CustomerGroup::HyperC => "Hyper C",
            CustomerGroup::PicknPay => "PnP",
            CustomerGroup::Mega => "Mega",
            CustomerGroup::Dermott => "Dermott",
            CustomerGroup::Other => "Other",
        }
    }
}

impl fmt::Display for CustomerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CustomerGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

const WHOLE_BIRD: &[&str] = &["WHOLE", "WHOLE BIRD", "NO GIB"];
const DELI: &[&str] = &["DELI", "BBQ", "SMOKED", "GRILL", "MARINATED"];
const BREAST_FILLET: &[&str] = &["BREAST", "FILLET"];
const PORTION: &[&str] = &[
    "DRUMSTICK",
    "THIGH",
    "WING",
    "PORTION",
    "BRAAI PACK",
    "BRAAIPACK",
    "FAMILY PACK",
];
const FROZEN: &[&str] = &["FROZEN", "IQF", "FRZ", "(FRZ)"];
const VALUE_ADD: &[&str] = &[
    "CRUMB",
    "MARINATED",
    "ESPETADA",
    "GRILL",
    "RUSSIAN",
    "KIEV",
    "SCHNITZEL",
];
const OFFAL: &[&str] = &[
    "BACK", "NECK", "OFFAL", "GIBLET", "GIZZARD", "HEART", "LIVER", "SOUP", "PACK",
];

const TAKE_N_PAY: &[&str] = &["TAKE N PAY", "T&P"];
const SPAR: &[&str] = &["SPAR"];
const SPAR_QUALIFIERS: &[&str] = &["SUPER", "DC", "DISTRIBUTION"];
const HYPER: &[&str] = &["HYPER"];
const PICK_N_PAY: &[&str] = &["PICK N PAY", "PNP", "PICK 'N PAY"];
const MEGA: &[&str] = &["MEGA"];
const DERMOTT: &[&str] = &["DERMOTT"];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Classify a product name into its category.
pub fn classify_product(name: &str, policy: UnmatchedProductPolicy) -> Category {
    let upper = name.to_uppercase();
    let deli = contains_any(&upper, DELI);

    if contains_any(&upper, WHOLE_BIRD) {
        return if deli { Category::DeliWb } else { Category::Wb };
    }
    if contains_any(&upper, BREAST_FILLET) {
        return if deli { Category::DeliWb } else { Category::Fillets };
    }
    if contains_any(&upper, PORTION) {
        return Category::Portion;
    }
    let frozen = contains_any(&upper, FROZEN);
    if frozen {
        return Category::VAddFrozen;
    }
    if contains_any(&upper, VALUE_ADD) && !frozen {
        return Category::VAdd;
    }
    if contains_any(&upper, OFFAL) {
        return Category::OffalFresh;
    }

    match policy {
        UnmatchedProductPolicy::Wb => Category::Wb,
        UnmatchedProductPolicy::Other => Category::Other,
    }
}

/// Classify a customer name into its retail group.
pub fn classify_customer_group(name: &str, strictness: SparStrictness) -> CustomerGroup {
    let upper = name.to_uppercase();

    if contains_any(&upper, TAKE_N_PAY) {
        return CustomerGroup::TakeNPay;
    }
    if contains_any(&upper, SPAR) {
        let qualifies = match strictness {
            SparStrictness::Lenient => true,
            SparStrictness::Strict => contains_any(&upper, SPAR_QUALIFIERS),
        };
        if qualifies {
            return CustomerGroup::SparDropShip;
        }
    }
    if contains_any(&upper, HYPER) {
        return CustomerGroup::HyperC;
    }
    if contains_any(&upper, PICK_N_PAY) {
        return CustomerGroup::PicknPay;
    }
    if contains_any(&upper, MEGA) {
        return CustomerGroup::Mega;
    }
    if contains_any(&upper, DERMOTT) {
        return CustomerGroup::Dermott;
    }
    CustomerGroup::Other
}
