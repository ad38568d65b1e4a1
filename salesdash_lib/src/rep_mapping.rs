//! Sales rep to customer mapping.
//!
//! The mapping is compiled into the binary from YAML seed data and validated
//! on load: rep names and customer names must be non-empty, reps are unique,
//! and no customer account is shared between two reps.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// Error types for rep mapping operations.
#[derive(Error, Debug)]
pub enum RepMappingError {
    #[error("Failed to parse rep mapping YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Duplicate rep in mapping: {0}")]
    DuplicateRep(String),
    #[error("Customer {customer} is assigned to both {first} and {second}")]
    SharedCustomer {
        customer: String,
        first: String,
        second: String,
    },
    #[error("Empty name in rep mapping for rep '{0}'")]
    EmptyName(String),
}

/// Top-level structure for the rep mapping YAML file.
#[derive(Deserialize, Debug)]
pub struct RepMappingFile {
    pub reps: Vec<RepCustomers>,
}

/// A rep and the customers they manage.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RepCustomers {
    pub rep: String,
    pub customers: Vec<String>,
}

impl RepCustomers {
    /// Case-insensitive membership test on the trimmed customer name.
    pub fn manages(&self, customer: &str) -> bool {
        let wanted = customer.trim();
        self.customers.iter().any(|c| c.eq_ignore_ascii_case(wanted))
    }
}

/// Parse and validate rep mappings from YAML content.
pub fn parse_rep_mappings(yaml_content: &str) -> Result<Vec<RepCustomers>, RepMappingError> {
    let file: RepMappingFile = serde_yml::from_str(yaml_content)?;

    let mut seen_reps = HashSet::new();
    let mut owner_of: Vec<(String, String)> = Vec::new();
    let mut validated = Vec::with_capacity(file.reps.len());

    for entry in file.reps {
        let rep = entry.rep.trim().to_string();
        if rep.is_empty() {
            return Err(RepMappingError::EmptyName(entry.rep));
        }
        if !seen_reps.insert(rep.to_lowercase()) {
            return Err(RepMappingError::DuplicateRep(rep));
        }

        let mut customers = Vec::with_capacity(entry.customers.len());
        for customer in entry.customers {
            let customer = customer.trim().to_string();
            if customer.is_empty() {
                return Err(RepMappingError::EmptyName(rep));
            }
            let key = customer.to_lowercase();
            if let Some((_, first)) = owner_of.iter().find(|(c, _)| *c == key) {
                return Err(RepMappingError::SharedCustomer {
                    customer,
                    first: first.clone(),
                    second: rep,
                });
            }
            owner_of.push((key, rep.clone()));
            customers.push(customer);
        }

        validated.push(RepCustomers { rep, customers });
    }

    Ok(validated)
}

/// Load rep mappings from the embedded seed file.
pub fn load_rep_mappings() -> Result<Vec<RepCustomers>, RepMappingError> {
    let yaml_content = include_str!("../../seed_data/rep_customers.yml");
    parse_rep_mappings(yaml_content)
}

/// Find a rep by name, case-insensitively.
pub fn find_rep<'a>(mappings: &'a [RepCustomers], rep: &str) -> Option<&'a RepCustomers> {
    let wanted = rep.trim();
    mappings.iter().find(|m| m.rep.eq_ignore_ascii_case(wanted))
}
