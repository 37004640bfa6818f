//! Production pipeline: growing, boosting, harvesting, processing.

use kingpin_core::{
    genetics::{self, GeneticEntity, Rarity},
    rng::{RngBank, SubsystemSlot},
    store::{
        inventory::{BatchStage, CommodityUnit},
        pipeline::{GrowStage, PipelineStore, STATION_OVERFLOW_CEILING},
    },
    types::Drug,
    PlayerCommand, SimConfig, SimEngine,
};

fn starter(id: &str) -> GeneticEntity {
    GeneticEntity::starter(id.into(), "Bush Weed".into(), Drug::Weed, Rarity::Common)
}

fn raw_unit(id: &str, drug: Drug, grams: f64) -> CommodityUnit {
    CommodityUnit {
        id: id.into(),
        strain_name: "Test Batch".into(),
        drug,
        rarity: Rarity::Common,
        quality: 60.0,
        purity: None,
        purity_bonus: 0.0,
        grams,
        stage: BatchStage::Harvested,
    }
}

#[test]
fn stage_thresholds_follow_progress() {
    assert_eq!(GrowStage::from_progress(0.0), GrowStage::Seed);
    assert_eq!(GrowStage::from_progress(19.9), GrowStage::Seed);
    assert_eq!(GrowStage::from_progress(20.0), GrowStage::Sprout);
    assert_eq!(GrowStage::from_progress(45.0), GrowStage::Vegetative);
    assert_eq!(GrowStage::from_progress(70.0), GrowStage::Flowering);
    assert_eq!(GrowStage::from_progress(100.0), GrowStage::Mature);
}

#[test]
fn watered_plant_reaches_maturity() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    let seed = starter("s1");

    // 0.6 %/min -> 100% after ~167 minutes. Water never hits the dry
    // threshold in that window (100 - 0.35 * 167 = 41.5).
    let minutes = genetics::full_grow_minutes(cfg.growth.base_rate_per_minute, &seed);
    assert!((minutes - 100.0 / 0.6).abs() < 1e-9);

    store.plant(0, seed).expect("plant");
    store.advance_all(minutes + 1.0, &cfg.growth, &cfg);
    assert_eq!(store.slots()[0].stage, GrowStage::Mature);
    assert_eq!(store.slots()[0].progress, 100.0);
}

#[test]
fn dry_soil_halves_the_growth_rate() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    // Slow strain so the soil dries out long before maturity.
    let mut slow = starter("s1");
    slow.growth_speed = 0.3;
    store.plant(0, slow).expect("plant");

    // Water crosses the dry threshold at (100 - 20) / 0.35 ≈ 229 min.
    store.advance_all(230.0, &cfg.growth, &cfg);
    let before = store.slots()[0].progress;
    assert!(store.slots()[0].water_level < cfg.growth.dry_threshold);

    store.advance_all(100.0, &cfg.growth, &cfg);
    let gained = store.slots()[0].progress - before;
    // Full rate would be 0.18 %/min; dry rate is half that.
    assert!((gained - 9.0).abs() < 1e-6, "dry growth gained {gained}%");
}

#[test]
fn watering_resets_the_water_level() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    store.plant(0, starter("s1")).expect("plant");
    store.advance_all(100.0, &cfg.growth, &cfg);
    assert!(store.slots()[0].water_level < 100.0);
    store.water(0).expect("water");
    assert_eq!(store.slots()[0].water_level, 100.0);
}

#[test]
fn boost_advances_progress_without_time() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    store.plant(0, starter("s1")).expect("plant");

    let progress = store.boost(0, 10, &cfg.growth).expect("boost");
    assert!((progress - 15.0).abs() < 1e-6, "10 taps at 1.5 each: {progress}");

    // Boosting an empty slot is rejected.
    assert!(store.boost(1, 1, &cfg.growth).is_err());
}

#[test]
fn harvest_resets_slot_and_rolls_yield() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    store.plant(0, starter("s1")).expect("plant");
    store.advance_all(200.0, &cfg.growth, &cfg);

    let bank = RngBank::new(99);
    let mut rng = bank.for_subsystem_at_tick(SubsystemSlot::Pipeline, 0);
    let outcome = store
        .harvest(0, "unit-1".into(), "seed-1".into(), &cfg, &mut rng)
        .expect("harvest");

    // base_yield 20, jitter in [0.8, 1.2].
    assert!(outcome.unit.grams >= 16.0 && outcome.unit.grams <= 24.0);
    assert!(outcome.unit.quality >= 0.0 && outcome.unit.quality <= 100.0);
    assert_eq!(outcome.unit.stage, BatchStage::Harvested);
    assert!(store.slots()[0].occupant.is_none());
    assert_eq!(store.slots()[0].progress, 0.0);

    // Harvesting the now-empty slot is rejected.
    assert!(store
        .harvest(0, "unit-2".into(), "seed-2".into(), &cfg, &mut rng)
        .is_err());
}

#[test]
fn harvest_before_maturity_is_rejected() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    store.plant(0, starter("s1")).expect("plant");
    store.advance_all(50.0, &cfg.growth, &cfg);

    let bank = RngBank::new(1);
    let mut rng = bank.for_subsystem_at_tick(SubsystemSlot::Pipeline, 0);
    assert!(store
        .harvest(0, "unit-1".into(), "seed-1".into(), &cfg, &mut rng)
        .is_err());
}

#[test]
fn processing_retains_grams_and_assigns_purity() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    let station_id = store.idle_station(Drug::Koks).expect("koks station");

    store
        .start_processing(station_id, raw_unit("u1", Drug::Koks, 10.0), &cfg)
        .expect("start");

    // Output computed up front: 10g * 0.35 retention, purity 25 + 18.
    // Collect is rejected until progress reaches 100.
    assert!(store.collect(station_id).is_err());

    // 45-minute duration at level 1.
    store.advance_all(45.0, &cfg.growth, &cfg);
    let batch = store.collect(station_id).expect("collect");
    assert!((batch.grams - 3.5).abs() < 1e-6);
    assert_eq!(batch.purity, Some(43.0));
    assert_eq!(batch.stage, BatchStage::Refined);
    assert!(store.stations()[station_id].current_batch.is_none());
}

#[test]
fn lineage_purity_bonus_lands_in_the_refined_batch() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    let mut bred =
        GeneticEntity::starter("s1".into(), "Lab Koks".into(), Drug::Koks, Rarity::Rare);
    bred.purity_bonus = 12.0;
    store.plant(0, bred).expect("plant");
    store.advance_all(200.0, &cfg.growth, &cfg);

    let bank = RngBank::new(7);
    let mut rng = bank.for_subsystem_at_tick(SubsystemSlot::Pipeline, 0);
    let outcome = store
        .harvest(0, "unit-1".into(), "seed-1".into(), &cfg, &mut rng)
        .expect("harvest");
    assert_eq!(outcome.unit.purity_bonus, 12.0);

    let station_id = store.idle_station(Drug::Koks).expect("koks station");
    store
        .start_processing(station_id, outcome.unit, &cfg)
        .expect("start");
    store.advance_all(45.0, &cfg.growth, &cfg);
    // base 25 + flat 18 + lineage 12.
    let batch = store.collect(station_id).expect("collect");
    assert_eq!(batch.purity, Some(55.0));

    // A plain strain refines without the lineage bump.
    store
        .start_processing(station_id, raw_unit("u2", Drug::Koks, 5.0), &cfg)
        .expect("start plain");
    store.advance_all(45.0, &cfg.growth, &cfg);
    assert_eq!(store.collect(station_id).expect("collect").purity, Some(43.0));
}

#[test]
fn stations_clamp_at_the_overflow_ceiling() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    let station_id = store.idle_station(Drug::Koks).expect("koks station");
    store
        .start_processing(station_id, raw_unit("u1", Drug::Koks, 10.0), &cfg)
        .expect("start");

    store.advance_all(500.0, &cfg.growth, &cfg);
    assert_eq!(store.stations()[station_id].progress, STATION_OVERFLOW_CEILING);
    assert_eq!(store.overflowed_stations(), vec![station_id]);
}

#[test]
fn busy_station_rejects_a_second_batch() {
    let cfg = SimConfig::default_balance();
    let mut store = PipelineStore::new(&cfg);
    let station_id = store.idle_station(Drug::Koks).expect("koks station");
    store
        .start_processing(station_id, raw_unit("u1", Drug::Koks, 10.0), &cfg)
        .expect("start");
    assert!(store
        .can_accept(station_id, &raw_unit("u2", Drug::Koks, 5.0))
        .is_err());
}

#[test]
fn wrong_drug_or_stage_is_ineligible_for_processing() {
    let cfg = SimConfig::default_balance();
    let store = PipelineStore::new(&cfg);
    let station_id = store.idle_station(Drug::Koks).expect("koks station");

    assert!(store
        .can_accept(station_id, &raw_unit("u1", Drug::Weed, 5.0))
        .is_err());

    let mut refined = raw_unit("u2", Drug::Koks, 5.0);
    refined.stage = BatchStage::Refined;
    refined.purity = Some(50.0);
    assert!(store.can_accept(station_id, &refined).is_err());
}

#[test]
fn unlock_slot_costs_cash_and_fails_when_broke() {
    let mut engine =
        SimEngine::new("unlock-test".into(), 5, SimConfig::default_balance()).expect("engine");

    // Starting cash 1000, unlock cost 500: two unlocks, then broke.
    engine.execute(PlayerCommand::UnlockSlot).expect("first unlock");
    engine.execute(PlayerCommand::UnlockSlot).expect("second unlock");
    let err = engine.execute(PlayerCommand::UnlockSlot).unwrap_err();
    assert!(matches!(
        err,
        kingpin_core::SimError::InsufficientResource { .. }
    ));

    let unlocked = engine
        .world()
        .pipeline
        .slots()
        .iter()
        .filter(|s| s.unlocked)
        .count();
    assert_eq!(unlocked, 5);
    assert_eq!(engine.world().cash(), 0);
}

#[test]
fn plant_command_rejects_occupied_slot_without_consuming_seed() {
    let mut engine =
        SimEngine::new("plant-test".into(), 5, SimConfig::default_balance()).expect("engine");
    let seeds: Vec<String> = engine
        .world()
        .inventory
        .seeds()
        .iter()
        .map(|s| s.id.clone())
        .collect();

    engine
        .execute(PlayerCommand::Plant { slot_id: 0, seed_id: seeds[0].clone() })
        .expect("plant");
    let before = engine.world().inventory.seeds().len();
    let err = engine
        .execute(PlayerCommand::Plant { slot_id: 0, seed_id: seeds[1].clone() })
        .unwrap_err();
    assert!(matches!(err, kingpin_core::SimError::InvalidState { .. }));
    assert_eq!(engine.world().inventory.seeds().len(), before);
}
