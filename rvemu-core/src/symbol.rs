//! Address to symbol mapping

use crate::Address;
use std::collections::BTreeMap;

/// Maps an address to a symbol name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<Address, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, adr: Address, name: impl Into<String>) {
        self.symbols.insert(adr, name.into());
    }

    /// Symbol defined exactly at `adr`.
    pub fn get(&self, adr: Address) -> Option<&str> {
        self.symbols.get(&adr).map(String::as_str)
    }

    /// Nearest symbol at or below `adr`, rendered as `name` or `name+0x10`.
    pub fn describe(&self, adr: Address) -> Option<String> {
        let (base, name) = self.symbols.range(..=adr).next_back()?;
        let ofs = adr - base;
        if ofs == 0 {
            Some(name.clone())
        } else {
            Some(format!("{}+{:#x}", name, ofs))
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Address, &str)> {
        self.symbols.iter().map(|(adr, name)| (*adr, name.as_str()))
    }
}
