//! The customer ledger — population, lifecycle state, addiction, and
//! the purchase-request protocol state.
//!
//! All loyalty/satisfaction/addiction mutations go through this
//! aggregate so the [0, 100] clamps and the status recomputation stay
//! in one place. Request generation/expiry timing lives in the demand
//! subsystem; the ledger owns the state transitions themselves.

use crate::{
    error::{SimError, SimResult},
    pricing::Relationship,
    rng::SubsystemRng,
    types::{clamp_pct, Cash, Drug, Minutes, Urgency},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Lifecycle tier, a pure function of loyalty (with the prospect pin
/// and the post-purchase floor applied by `Customer::recompute_status`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Prospect,
    Active,
    Loyal,
    Vip,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::Active => "active",
            Self::Loyal => "loyal",
            Self::Vip => "vip",
        }
    }
}

/// Loyalty thresholds: 0 → prospect, 1-40 active, 41-80 loyal, 81+ vip.
pub fn status_for_loyalty(loyalty: f64) -> CustomerStatus {
    if loyalty > 80.0 {
        CustomerStatus::Vip
    } else if loyalty > 40.0 {
        CustomerStatus::Loyal
    } else if loyalty > 0.0 {
        CustomerStatus::Active
    } else {
        CustomerStatus::Prospect
    }
}

/// Reaction archetype for cross-drug offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Paranoid,
    Hardcore,
    Adventurous,
    Casual,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paranoid => "paranoid",
            Self::Hardcore => "hardcore",
            Self::Adventurous => "adventurous",
            Self::Casual => "casual",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id:             String,
    pub drug:           Drug,
    pub grams:          f64,
    pub max_price:      Cash,
    pub expires_at_minutes: Minutes,
    pub urgency:        Urgency,
    /// Spontaneous requests want an explicit accept/ignore; they carry
    /// no expiry penalty and are silently dropped past their horizon.
    pub spontaneous:    bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id:             String,
    pub name:           String,
    pub loyalty:        f64,
    pub satisfaction:   f64,
    pub spending_power: f64,
    pub status:         CustomerStatus,
    /// The drug this customer walked in for. Always in `preferences`;
    /// scheduled demand falls back to it on addiction ties.
    pub base_drug:      Drug,
    pub preferences:    BTreeSet<Drug>,
    pub addiction:      BTreeMap<Drug, f64>,
    pub pending_request: Option<PurchaseRequest>,
    pub personality:    Personality,
    pub blocked:        bool,
    pub has_purchased:  bool,
    pub next_request_at_minutes:  Minutes,
    pub last_purchase_at_minutes: Option<Minutes>,
}

impl Customer {
    pub fn prospect(
        id: String,
        name: String,
        base_drug: Drug,
        personality: Personality,
        spending_power: f64,
        first_request_at: Minutes,
    ) -> Self {
        let mut preferences = BTreeSet::new();
        preferences.insert(base_drug);
        Self {
            id,
            name,
            loyalty: 0.0,
            satisfaction: 60.0,
            spending_power: clamp_pct(spending_power),
            status: CustomerStatus::Prospect,
            base_drug,
            preferences,
            addiction: BTreeMap::new(),
            pending_request: None,
            personality,
            blocked: false,
            has_purchased: false,
            next_request_at_minutes: first_request_at,
            last_purchase_at_minutes: None,
        }
    }

    pub fn addiction(&self, drug: Drug) -> f64 {
        self.addiction.get(&drug).copied().unwrap_or(0.0)
    }

    /// The drug a scheduled request asks for: the preference with the
    /// highest addiction score; ties and zero addiction fall back to
    /// the base drug.
    pub fn preferred_drug(&self) -> Drug {
        let mut best = self.base_drug;
        let mut best_score = self.addiction(best);
        for drug in self.preferences.iter().copied() {
            if self.addiction(drug) > best_score {
                best = drug;
                best_score = self.addiction(drug);
            }
        }
        best
    }

    pub fn relationship(&self) -> Relationship {
        Relationship {
            loyalty: self.loyalty,
            spending_power: self.spending_power,
        }
    }

    pub fn bump_loyalty(&mut self, delta: f64) {
        self.loyalty = clamp_pct(self.loyalty + delta);
        self.recompute_status();
    }

    pub fn bump_satisfaction(&mut self, delta: f64) {
        self.satisfaction = clamp_pct(self.satisfaction + delta);
    }

    pub fn bump_addiction(&mut self, drug: Drug, delta: f64) {
        let v = self.addiction.entry(drug).or_insert(0.0);
        *v = clamp_pct(*v + delta);
    }

    /// Status from loyalty, with two protocol rules layered on top:
    /// prospects stay pinned until converted, and a customer never
    /// falls below Active after their first purchase.
    pub fn recompute_status(&mut self) {
        if self.status == CustomerStatus::Prospect {
            self.loyalty = 0.0;
            return;
        }
        let mut status = status_for_loyalty(self.loyalty);
        if self.has_purchased && status == CustomerStatus::Prospect {
            status = CustomerStatus::Active;
        }
        self.status = status;
    }

    /// Convert a prospect after a successful sample.
    pub fn convert(&mut self, starting_loyalty: f64) {
        self.status = CustomerStatus::Active;
        self.loyalty = clamp_pct(starting_loyalty.max(1.0));
        self.recompute_status();
    }

    /// Urgency from addiction and loyalty thresholds.
    pub fn urgency_for(&self, drug: Drug) -> Urgency {
        let score = self.addiction(drug) + self.loyalty * 0.1;
        if score >= 80.0 {
            Urgency::Desperate
        } else if score >= 55.0 {
            Urgency::High
        } else if score >= 30.0 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    /// Dealer targeting weight: addicts and big spenders buy more.
    pub fn sale_weight(&self) -> f64 {
        let max_addiction = self
            .addiction
            .values()
            .fold(0.0_f64, |acc, v| acc.max(*v));
        1.0 + max_addiction / 40.0 + self.spending_power / 60.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerLedger {
    customers: Vec<Customer>,
}

impl CustomerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, customer: Customer) {
        self.customers.push(customer);
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Customer> {
        self.customers.iter_mut()
    }

    pub fn get(&self, id: &str) -> SimResult<&Customer> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| SimError::not_found("customer", id))
    }

    pub fn get_mut(&mut self, id: &str) -> SimResult<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| SimError::not_found("customer", id))
    }

    pub fn remove(&mut self, id: &str) -> SimResult<Customer> {
        let idx = self
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SimError::not_found("customer", id))?;
        Ok(self.customers.remove(idx))
    }

    /// Ids of customers flagged for removal (blocked or churned).
    /// Removal itself happens at the top of the demand pass, so a
    /// paranoid block becomes visible exactly one tick later.
    pub fn flagged_for_removal(&self, churn_threshold: f64) -> Vec<(String, String)> {
        self.customers
            .iter()
            .filter_map(|c| {
                if c.blocked {
                    Some((c.id.clone(), "blocked".to_string()))
                } else if c.satisfaction < churn_threshold {
                    Some((c.id.clone(), "dissatisfied".to_string()))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Weighted-random buyer for dealer agents. Only converted,
    /// unblocked customers are targets.
    pub fn pick_buyer(&self, rng: &mut SubsystemRng) -> Option<&Customer> {
        let candidates: Vec<&Customer> = self
            .customers
            .iter()
            .filter(|c| c.status != CustomerStatus::Prospect && !c.blocked)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let weights: Vec<f64> = candidates.iter().map(|c| c.sale_weight()).collect();
        let idx = rng.weighted_index(&weights);
        Some(candidates[idx])
    }

    /// Record a completed sale on the relationship. Called from every
    /// sale path after payment has been committed.
    pub fn record_sale(
        &mut self,
        customer_id: &str,
        drug: Drug,
        grams: f64,
        minutes: Minutes,
        loyalty_per_sale: f64,
        satisfaction_per_sale: f64,
        addiction_per_gram: f64,
    ) -> SimResult<()> {
        let c = self.get_mut(customer_id)?;
        c.has_purchased = true;
        c.last_purchase_at_minutes = Some(minutes);
        c.bump_loyalty(loyalty_per_sale);
        c.bump_satisfaction(satisfaction_per_sale);
        c.bump_addiction(drug, addiction_per_gram * grams);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer::prospect(
            "c-1".into(),
            "Test Buyer".into(),
            Drug::Weed,
            Personality::Casual,
            50.0,
            60.0,
        )
    }

    #[test]
    fn prospect_loyalty_is_pinned_at_zero() {
        let mut c = customer();
        c.bump_loyalty(25.0);
        assert_eq!(c.loyalty, 0.0);
        assert_eq!(c.status, CustomerStatus::Prospect);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(status_for_loyalty(0.0), CustomerStatus::Prospect);
        assert_eq!(status_for_loyalty(1.0), CustomerStatus::Active);
        assert_eq!(status_for_loyalty(40.0), CustomerStatus::Active);
        assert_eq!(status_for_loyalty(41.0), CustomerStatus::Loyal);
        assert_eq!(status_for_loyalty(80.0), CustomerStatus::Loyal);
        assert_eq!(status_for_loyalty(81.0), CustomerStatus::Vip);
    }

    #[test]
    fn purchased_customers_never_fall_below_active() {
        let mut c = customer();
        c.convert(5.0);
        c.has_purchased = true;
        c.bump_loyalty(-100.0);
        assert_eq!(c.status, CustomerStatus::Active);
    }

    #[test]
    fn urgency_scales_with_addiction() {
        let mut c = customer();
        c.convert(5.0);
        assert_eq!(c.urgency_for(Drug::Koks), Urgency::Low);
        c.bump_addiction(Drug::Koks, 35.0);
        assert_eq!(c.urgency_for(Drug::Koks), Urgency::Medium);
        c.bump_addiction(Drug::Koks, 30.0);
        assert_eq!(c.urgency_for(Drug::Koks), Urgency::High);
        c.bump_addiction(Drug::Koks, 30.0);
        assert_eq!(c.urgency_for(Drug::Koks), Urgency::Desperate);
    }

    #[test]
    fn preferred_drug_follows_addiction() {
        let mut c = customer();
        c.preferences.insert(Drug::Koks);
        c.bump_addiction(Drug::Koks, 50.0);
        assert_eq!(c.preferred_drug(), Drug::Koks);
    }

    #[test]
    fn preferred_drug_breaks_ties_toward_the_base_drug() {
        let mut c = customer();
        c.preferences.insert(Drug::Koks);
        c.bump_addiction(Drug::Koks, 50.0);
        c.bump_addiction(Drug::Weed, 50.0);
        assert_eq!(c.preferred_drug(), Drug::Weed);

        // Zero addiction everywhere also lands on the base drug.
        let c = customer();
        assert_eq!(c.preferred_drug(), Drug::Weed);
    }
}
