#![deny(warnings)]

//! Headless Bevy HUD: taps queue up in a resource and a system feeds them to
//! the sale store once per frame.

use bevy_ecs::prelude::*;
use dessert_core::dessert_catalog;
use dessert_store::SaleStateStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Resource)]
struct Bakery(SaleStateStore);

/// Taps received since the last frame.
#[derive(Resource, Default)]
struct PendingTaps(u32);

#[derive(Resource, Default, Debug, PartialEq)]
struct HudState {
    desserts_sold: u64,
    revenue: u64,
    image_ref: String,
    last_event: String,
}

fn apply_taps_system(mut taps: ResMut<PendingTaps>, mut bakery: ResMut<Bakery>) {
    for _ in 0..taps.0 {
        bakery.0.sell();
    }
    taps.0 = 0;
}

fn render_hud_system(bakery: Res<Bakery>, mut hud: ResMut<HudState>) {
    let s = bakery.0.state();
    if s.desserts_sold != hud.desserts_sold {
        hud.last_event = format!("+{} sold", s.desserts_sold - hud.desserts_sold);
    }
    hud.desserts_sold = s.desserts_sold;
    hud.revenue = s.revenue;
    hud.image_ref.clone_from(&s.active_entry.image_ref);
}

fn build(store: SaleStateStore) -> (World, Schedule) {
    let mut world = World::new();
    world.insert_resource(Bakery(store));
    world.insert_resource(PendingTaps::default());
    world.insert_resource(HudState::default());
    let mut schedule = Schedule::default();
    schedule.add_systems((apply_taps_system, render_hud_system).chain());
    (world, schedule)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let taps: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(6);
    let (mut world, mut schedule) = build(SaleStateStore::new(dessert_catalog()));
    // No run loop: one frame per tap
    for _ in 0..taps {
        world.resource_mut::<PendingTaps>().0 += 1;
        schedule.run(&mut world);
    }
    schedule.run(&mut world);
    let s = world.resource::<HudState>();
    info!(frames = taps + 1, "headless run finished");
    println!(
        "game-frontend: HUD ready | sold={} revenue=${} image={}",
        s.desserts_sold, s.revenue, s.image_ref
    );
}
