use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// Ordered, duplicate-free set of symbols under monitoring.
///
/// Session-lifetime only; there is no durable storage. An evaluation pass
/// iterates a [`snapshot`](Watchlist::snapshot) of the list so user edits
/// never race a running pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    symbols: Vec<Symbol>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated symbol list. Whitespace around items is
    /// tolerated and empty items are skipped; duplicates collapse to their
    /// first position.
    pub fn parse_list(input: &str) -> Result<Self, ValidationError> {
        let mut watchlist = Self::new();
        for item in input.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            watchlist.add(Symbol::parse(item)?);
        }
        Ok(watchlist)
    }

    /// Append a symbol, preserving order. Returns false on duplicate.
    pub fn add(&mut self, symbol: Symbol) -> bool {
        if self.symbols.contains(&symbol) {
            return false;
        }
        self.symbols.push(symbol);
        true
    }

    /// Remove a symbol. Returns false if it was not present.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|existing| existing != symbol);
        self.symbols.len() != before
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Stable copy of the symbol list for one evaluation pass.
    pub fn snapshot(&self) -> Vec<Symbol> {
        self.symbols.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_list_in_order() {
        let watchlist = Watchlist::parse_list("spy, qqq ,DIA").expect("must parse");
        let symbols: Vec<&str> = watchlist.iter().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["SPY", "QQQ", "DIA"]);
    }

    #[test]
    fn skips_empty_items_and_collapses_duplicates() {
        let watchlist = Watchlist::parse_list("SPY,,qqq,SPY,").expect("must parse");
        let symbols: Vec<&str> = watchlist.iter().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["SPY", "QQQ"]);
    }

    #[test]
    fn add_and_remove_report_membership() {
        let mut watchlist = Watchlist::parse_list("SPY").expect("must parse");
        let qqq = Symbol::parse("QQQ").expect("symbol");

        assert!(watchlist.add(qqq.clone()));
        assert!(!watchlist.add(qqq.clone()));
        assert!(watchlist.remove(&qqq));
        assert!(!watchlist.remove(&qqq));
        assert_eq!(watchlist.len(), 1);
    }

    #[test]
    fn rejects_malformed_symbol_in_list() {
        let err = Watchlist::parse_list("SPY,123").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidStart { .. }));
    }
}
