use serde::{Deserialize, Serialize};

/// Source of truth for spendable currency.
///
/// The progression engine never keeps a balance of its own; it borrows a
/// ledger for the length of each call that may spend.
pub trait Ledger {
    fn balance(&self) -> u32;
    /// Deduct `amount`. Returns false, changing nothing, when it cannot.
    fn spend(&mut self, amount: u32) -> bool;
    fn award(&mut self, amount: u32, reason: &str);
}

/// In-process ledger with lifetime totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Wallet {
    balance: u32,
    total_earned: u64,
    total_spent: u64,
}

impl Wallet {
    pub fn new(balance: u32) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    pub fn total_earned(&self) -> u64 {
        self.total_earned
    }

    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }
}

impl Ledger for Wallet {
    fn balance(&self) -> u32 {
        self.balance
    }

    fn spend(&mut self, amount: u32) -> bool {
        if amount > self.balance {
            return false;
        }
        self.balance -= amount;
        self.total_spent += u64::from(amount);
        true
    }

    fn award(&mut self, amount: u32, reason: &str) {
        self.balance = self.balance.saturating_add(amount);
        self.total_earned += u64::from(amount);
        tracing::debug!(amount, reason, balance = self.balance, "currency awarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_is_all_or_nothing() {
        let mut w = Wallet::new(50);
        assert!(!w.spend(51));
        assert_eq!(w.balance(), 50);
        assert!(w.spend(50));
        assert_eq!(w.balance(), 0);
        assert_eq!(w.total_spent(), 50);
    }

    #[test]
    fn award_tracks_totals() {
        let mut w = Wallet::default();
        w.award(30, "pomodoro");
        w.award(u32::MAX, "jackpot");
        assert_eq!(w.balance(), u32::MAX);
        assert_eq!(w.total_earned(), 30 + u64::from(u32::MAX));
    }

    #[test]
    fn wallet_json_uses_camel_case() {
        let json = serde_json::to_value(Wallet::new(7)).unwrap();
        assert_eq!(json["balance"], 7);
        assert_eq!(json["totalEarned"], 0);
        let back: Wallet = serde_json::from_str(r#"{"balance": 3}"#).unwrap();
        assert_eq!(back.balance(), 3);
    }
}
