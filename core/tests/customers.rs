//! Customer ledger: sampling, requests, offers, churn.

use kingpin_core::{
    event::SimEvent,
    genetics::Rarity,
    store::customer::{Customer, CustomerStatus, Personality, PurchaseRequest},
    store::inventory::{BatchStage, CommodityUnit},
    types::{Drug, Urgency},
    CommandOutcome, PlayerCommand, SimConfig, SimEngine, SimError,
};

fn engine(seed: u64) -> SimEngine {
    SimEngine::new(format!("cust-test-{seed}"), seed, SimConfig::default_balance())
        .expect("engine")
}

fn all_events(engine: &SimEngine) -> Vec<SimEvent> {
    (0..=engine.clock().current_tick)
        .flat_map(|t| engine.events_for_tick(t).expect("decode"))
        .collect()
}

fn weed_unit(id: &str, quality: f64, grams: f64) -> CommodityUnit {
    CommodityUnit {
        id: id.into(),
        strain_name: "Bush Weed".into(),
        drug: Drug::Weed,
        rarity: Rarity::Common,
        quality,
        purity: None,
        purity_bonus: 0.0,
        grams,
        stage: BatchStage::Harvested,
    }
}

/// A converted customer far from any scheduled request.
fn converted(id: &str, personality: Personality, weed_addiction: f64) -> Customer {
    let mut c = Customer::prospect(
        id.into(),
        format!("Customer {id}"),
        Drug::Weed,
        personality,
        50.0,
        f64::MAX,
    );
    c.convert(5.0);
    if weed_addiction > 0.0 {
        c.bump_addiction(Drug::Weed, weed_addiction);
    }
    c
}

#[test]
fn sample_conversion_rate_tracks_quality() {
    let mut engine = engine(4242);
    engine
        .world_mut()
        .inventory
        .deposit_unit(weed_unit("stash", 90.0, 2500.0));

    const TRIALS: usize = 2000;
    for i in 0..TRIALS {
        let id = format!("p-{i}");
        engine.world_mut().customers.add(Customer::prospect(
            id,
            format!("Prospect {i}"),
            Drug::Weed,
            Personality::Casual,
            50.0,
            f64::MAX,
        ));
    }

    let mut conversions = 0;
    for i in 0..TRIALS {
        let outcome = engine
            .give_sample(&format!("p-{i}"), "stash")
            .expect("sample");
        if matches!(outcome, CommandOutcome::SampleResult { converted: true }) {
            conversions += 1;
        }
    }

    // quality 90 -> p = 0.3 + 0.9 * 0.5 = 0.75
    let rate = conversions as f64 / TRIALS as f64;
    assert!(
        (0.70..=0.80).contains(&rate),
        "conversion rate {rate} outside expected band around 0.75"
    );
}

#[test]
fn converted_prospect_gets_loyalty_and_seeded_addiction() {
    let mut engine = engine(7);
    engine
        .world_mut()
        .inventory
        .deposit_unit(weed_unit("stash", 100.0, 50.0));
    engine.world_mut().customers.add(Customer::prospect(
        "p-1".into(),
        "Prospect One".into(),
        Drug::Weed,
        Personality::Casual,
        50.0,
        f64::MAX,
    ));

    // quality 100 -> p = 0.8; retry across command streams until one
    // converts. Each attempt burns exactly one sample gram.
    let mut converted_at = None;
    for attempt in 0..20 {
        match engine.give_sample("p-1", "stash").expect("sample") {
            CommandOutcome::SampleResult { converted: true } => {
                converted_at = Some(attempt);
                break;
            }
            _ => continue,
        }
    }
    assert!(converted_at.is_some(), "no conversion in 20 attempts at p=0.8");

    let c = engine.world().customers.get("p-1").expect("customer");
    assert_eq!(c.status, CustomerStatus::Active);
    assert_eq!(c.addiction(Drug::Weed), 15.0);
    assert!(c.loyalty >= 1.0);

    // A second sample for an already-converted customer is rejected.
    assert!(matches!(
        engine.give_sample("p-1", "stash").unwrap_err(),
        SimError::Ineligible { .. }
    ));
}

#[test]
fn heavy_addiction_produces_desperate_requests() {
    let mut engine = engine(11);
    let mut c = converted("c-1", Personality::Casual, 90.0);
    c.next_request_at_minutes = 0.0;
    engine.world_mut().customers.add(c);

    engine.run_ticks(1, 1.0).expect("tick");

    let issued: Vec<SimEvent> = all_events(&engine)
        .into_iter()
        .filter(|e| matches!(e, SimEvent::RequestIssued { customer_id, .. } if customer_id == "c-1"))
        .collect();
    assert_eq!(issued.len(), 1);
    match &issued[0] {
        SimEvent::RequestIssued {
            urgency,
            grams,
            expires_at_minutes,
            spontaneous,
            ..
        } => {
            assert_eq!(*urgency, Urgency::Desperate);
            assert!((15.0..30.0).contains(grams), "desperate grams: {grams}");
            // Desperate requests carry a 5-minute fuse.
            assert!((expires_at_minutes - 6.0).abs() < 1e-9);
            assert!(!spontaneous);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn expired_scheduled_request_costs_loyalty_and_satisfaction() {
    let mut engine = engine(3);
    let mut c = converted("c-1", Personality::Casual, 0.0);
    c.loyalty = 50.0;
    c.pending_request = Some(PurchaseRequest {
        id: "req-1".into(),
        drug: Drug::Weed,
        grams: 8.0,
        max_price: 120,
        expires_at_minutes: 5.0,
        urgency: Urgency::High,
        spontaneous: false,
    });
    engine.world_mut().customers.add(c);

    engine.run_ticks(1, 10.0).expect("tick");

    let c = engine.world().customers.get("c-1").expect("customer");
    assert!(c.pending_request.is_none());
    // High urgency: -7 loyalty, -9 satisfaction.
    assert_eq!(c.loyalty, 43.0);
    assert_eq!(c.satisfaction, 51.0);
    assert!(all_events(&engine)
        .iter()
        .any(|e| matches!(e, SimEvent::RequestExpired { customer_id, .. } if customer_id == "c-1")));
}

#[test]
fn lapsed_spontaneous_request_is_penalty_free() {
    let mut engine = engine(3);
    let mut c = converted("c-1", Personality::Casual, 0.0);
    c.loyalty = 50.0;
    c.pending_request = Some(PurchaseRequest {
        id: "req-1".into(),
        drug: Drug::Weed,
        grams: 4.0,
        max_price: 60,
        expires_at_minutes: 5.0,
        urgency: Urgency::Medium,
        spontaneous: true,
    });
    engine.world_mut().customers.add(c);

    engine.run_ticks(1, 10.0).expect("tick");

    let c = engine.world().customers.get("c-1").expect("customer");
    assert!(c.pending_request.is_none());
    assert_eq!(c.loyalty, 50.0);
    assert_eq!(c.satisfaction, 60.0);
    assert!(!all_events(&engine)
        .iter()
        .any(|e| matches!(e, SimEvent::RequestExpired { .. })));
}

#[test]
fn pending_request_suppresses_new_demand() {
    let mut engine = engine(19);
    let mut c = converted("c-1", Personality::Casual, 50.0);
    c.next_request_at_minutes = 0.0;
    c.pending_request = Some(PurchaseRequest {
        id: "req-1".into(),
        drug: Drug::Weed,
        grams: 5.0,
        max_price: 80,
        expires_at_minutes: f64::MAX,
        urgency: Urgency::Medium,
        spontaneous: false,
    });
    engine.world_mut().customers.add(c);

    engine.run_ticks(5, 10.0).expect("ticks");

    // Neither the scheduled pass nor the spontaneous roll may issue a
    // second request while one is pending.
    assert!(!all_events(&engine)
        .iter()
        .any(|e| matches!(e, SimEvent::RequestIssued { customer_id, .. } if customer_id == "c-1")));
}

#[test]
fn fulfill_request_pays_max_price_and_clears_the_request() {
    let mut engine = engine(23);
    engine
        .world_mut()
        .inventory
        .deposit_unit(weed_unit("stash", 70.0, 10.0));
    let mut c = converted("c-1", Personality::Casual, 0.0);
    let loyalty_before = c.loyalty;
    c.pending_request = Some(PurchaseRequest {
        id: "req-1".into(),
        drug: Drug::Weed,
        grams: 5.0,
        max_price: 100,
        expires_at_minutes: f64::MAX,
        urgency: Urgency::Medium,
        spontaneous: false,
    });
    engine.world_mut().customers.add(c);

    let cash_before = engine.world().cash();
    let outcome = engine.fulfill_request("c-1").expect("fulfill");
    assert!(matches!(outcome, CommandOutcome::RequestFulfilled { revenue: 100 }));
    assert_eq!(engine.world().cash(), cash_before + 100);
    assert!((engine.world().inventory.total_grams(Drug::Weed) - 5.0).abs() < 1e-6);

    let c = engine.world().customers.get("c-1").expect("customer");
    assert!(c.pending_request.is_none());
    assert_eq!(c.loyalty, loyalty_before + 2.5);
    assert!(c.has_purchased);
}

#[test]
fn fulfill_without_stock_reports_insufficient_grams() {
    let mut engine = engine(23);
    engine
        .world_mut()
        .inventory
        .deposit_unit(weed_unit("stash", 70.0, 10.0));
    let mut c = converted("c-1", Personality::Casual, 0.0);
    c.pending_request = Some(PurchaseRequest {
        id: "req-1".into(),
        drug: Drug::Weed,
        grams: 50.0,
        max_price: 600,
        expires_at_minutes: f64::MAX,
        urgency: Urgency::Desperate,
        spontaneous: false,
    });
    engine.world_mut().customers.add(c);

    let err = engine.fulfill_request("c-1").unwrap_err();
    assert!(matches!(err, SimError::InsufficientResource { .. }));
    // The request survives a failed fulfillment.
    assert!(engine
        .world()
        .customers
        .get("c-1")
        .unwrap()
        .pending_request
        .is_some());
}

#[test]
fn only_spontaneous_requests_can_be_ignored() {
    let mut engine = engine(29);
    let mut c = converted("c-1", Personality::Casual, 0.0);
    c.pending_request = Some(PurchaseRequest {
        id: "req-1".into(),
        drug: Drug::Weed,
        grams: 4.0,
        max_price: 60,
        expires_at_minutes: f64::MAX,
        urgency: Urgency::Low,
        spontaneous: true,
    });
    engine.world_mut().customers.add(c);

    engine.ignore_request("c-1").expect("ignore spontaneous");
    assert!(engine
        .world()
        .customers
        .get("c-1")
        .unwrap()
        .pending_request
        .is_none());

    let mut c2 = converted("c-2", Personality::Casual, 0.0);
    c2.pending_request = Some(PurchaseRequest {
        id: "req-2".into(),
        drug: Drug::Weed,
        grams: 4.0,
        max_price: 60,
        expires_at_minutes: f64::MAX,
        urgency: Urgency::Low,
        spontaneous: false,
    });
    engine.world_mut().customers.add(c2);
    assert!(matches!(
        engine.ignore_request("c-2").unwrap_err(),
        SimError::Ineligible { .. }
    ));
}

#[test]
fn paranoid_customer_blocks_and_is_removed_next_tick() {
    let mut engine = engine(31);
    engine
        .world_mut()
        .customers
        .add(converted("c-1", Personality::Paranoid, 0.0));

    let outcome = engine.offer_drug("c-1", Drug::Meth).expect("offer");
    assert!(matches!(
        outcome,
        CommandOutcome::OfferResult { accepted: false, blocked: true }
    ));
    // Still on the ledger until the next demand pass.
    assert!(engine.world().customers.get("c-1").is_ok());

    engine.run_ticks(1, 10.0).expect("tick");
    assert!(engine.world().customers.get("c-1").is_err());
    assert!(all_events(&engine).iter().any(|e| matches!(
        e,
        SimEvent::CustomerChurned { customer_id, reason, .. }
            if customer_id == "c-1" && reason == "blocked"
    )));
}

#[test]
fn hardcore_customer_accepts_any_offer() {
    let mut engine = engine(37);
    engine
        .world_mut()
        .customers
        .add(converted("c-1", Personality::Hardcore, 0.0));

    let outcome = engine.offer_drug("c-1", Drug::Koks).expect("offer");
    assert!(matches!(
        outcome,
        CommandOutcome::OfferResult { accepted: true, blocked: false }
    ));
    let c = engine.world().customers.get("c-1").expect("customer");
    assert!(c.preferences.contains(&Drug::Koks));
    assert_eq!(c.addiction(Drug::Koks), 15.0);

    // Offering a drug they already buy is ineligible.
    assert!(matches!(
        engine.offer_drug("c-1", Drug::Koks).unwrap_err(),
        SimError::Ineligible { .. }
    ));
}

#[test]
fn casual_customer_rejects_with_a_loyalty_dent() {
    let mut engine = engine(41);
    let mut c = converted("c-1", Personality::Casual, 0.0);
    c.loyalty = 20.0;
    engine.world_mut().customers.add(c);

    let outcome = engine.offer_drug("c-1", Drug::Meth).expect("offer");
    assert!(matches!(
        outcome,
        CommandOutcome::OfferResult { accepted: false, blocked: false }
    ));
    let c = engine.world().customers.get("c-1").expect("customer");
    assert_eq!(c.loyalty, 17.0);
    assert!(!c.preferences.contains(&Drug::Meth));
}

#[test]
fn dissatisfied_customers_churn() {
    let mut engine = engine(43);
    let mut c = converted("c-1", Personality::Casual, 0.0);
    c.satisfaction = 10.0;
    engine.world_mut().customers.add(c);

    engine.run_ticks(1, 10.0).expect("tick");
    assert!(engine.world().customers.get("c-1").is_err());
    assert!(all_events(&engine).iter().any(|e| matches!(
        e,
        SimEvent::CustomerChurned { reason, .. } if reason == "dissatisfied"
    )));
}

#[test]
fn prospects_trickle_in_over_time() {
    let mut engine = engine(47);
    engine.run_ticks(300, 10.0).expect("ticks");
    // 6 seeded prospects plus walk-ins at 0.015/min over 3000 minutes.
    assert!(
        engine.world().customers.len() > 6,
        "no walk-in prospects after 3000 minutes"
    );
}

#[test]
fn non_positive_gram_sales_are_rejected() {
    let mut engine = engine(59);
    engine
        .world_mut()
        .inventory
        .deposit_unit(weed_unit("stash", 70.0, 5.0));
    engine
        .world_mut()
        .customers
        .add(converted("c-1", Personality::Casual, 0.0));

    let cash_before = engine.world().cash();
    for grams in [0.0, -5.0] {
        assert!(matches!(
            engine.sell("c-1", "stash", grams).unwrap_err(),
            SimError::InvalidState { .. }
        ));
    }
    // Nothing minted, nothing paid, nothing recorded.
    assert!((engine.world().inventory.total_grams(Drug::Weed) - 5.0).abs() < 1e-9);
    assert_eq!(engine.world().cash(), cash_before);
    assert!(!engine.world().customers.get("c-1").unwrap().has_purchased);
}

#[test]
fn selling_to_a_prospect_is_rejected() {
    let mut engine = engine(53);
    engine
        .world_mut()
        .inventory
        .deposit_unit(weed_unit("stash", 70.0, 10.0));
    engine.world_mut().customers.add(Customer::prospect(
        "p-1".into(),
        "Prospect".into(),
        Drug::Weed,
        Personality::Casual,
        50.0,
        f64::MAX,
    ));

    assert!(matches!(
        engine.sell("p-1", "stash", 2.0).unwrap_err(),
        SimError::Ineligible { .. }
    ));
}
