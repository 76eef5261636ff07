//! # Contacts Directory
//!
//! Read-only lookup of remote participants by account, plus the local user
//! (`me`). Contact-list management lives outside this crate; the directory is
//! populated once from configuration or by the protocol layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub account: String,
    pub display_name: String,
    /// Personal/status message shown under the name.
    #[serde(default)]
    pub message: String,
}

impl Contact {
    pub fn new(
        account: impl Into<String>,
        display_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            display_name: display_name.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactDirectory {
    pub me: Contact,
    entries: HashMap<String, Contact>,
}

impl ContactDirectory {
    pub fn new(me: Contact) -> Self {
        Self {
            me,
            entries: HashMap::new(),
        }
    }

    pub fn with_contacts(me: Contact, contacts: impl IntoIterator<Item = Contact>) -> Self {
        let mut directory = Self::new(me);
        for contact in contacts {
            directory.insert(contact);
        }
        directory
    }

    /// Insert or replace the entry for `contact.account`.
    pub fn insert(&mut self, contact: Contact) {
        self.entries.insert(contact.account.clone(), contact);
    }

    pub fn get(&self, account: &str) -> Option<&Contact> {
        self.entries.get(account)
    }

    /// Display name for `account`, falling back to the raw account.
    pub fn display_name<'a>(&'a self, account: &'a str) -> &'a str {
        self.get(account)
            .map(|c| c.display_name.as_str())
            .unwrap_or(account)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
