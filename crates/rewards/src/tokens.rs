//! Simulated token reward

use serde::{Deserialize, Serialize};

/// Token balance accrued per blink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenWallet {
    balance: f64,
    initial: f64,
    per_blink: f64,
}

impl TokenWallet {
    pub fn new(initial: f64, per_blink: f64) -> Self {
        Self {
            balance: initial,
            initial,
            per_blink,
        }
    }

    /// Credit one blink and return the new balance
    pub fn credit_blink(&mut self) -> f64 {
        self.balance += self.per_blink;
        self.balance
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn reset(&mut self) {
        self.balance = self.initial;
    }
}
