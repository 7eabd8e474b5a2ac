//! Demo: a simulated drive through a scripted provider.
//!
//! Builds a two-leg trip, spawns a navigation session, and replays a
//! drive that wanders off the route once (triggering a correction from
//! the scripted provider) before arriving. Snapshots are logged as they
//! are published. Run with `RUST_LOG=debug` to also see ignored samples.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use nav_engine::geo::Coordinate;
use nav_engine::model::{
    Leg, Maneuver, ManeuverKind, Route, Step, Trip, TurnDirection,
};
use nav_engine::progress::ProgressConfig;
use nav_engine::provider::mock::MockRoutingProvider;
use nav_engine::session::{LocationSample, NavPhase, NavSnapshot, NavigationSession};

fn c(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon)
}

/// A step along evenly spaced vertices between `from` and `to`.
fn step(from: Coordinate, to: Coordinate, street: &str) -> Arc<Step> {
    let lerp = |t: f64| {
        c(
            from.latitude + (to.latitude - from.latitude) * t,
            from.longitude + (to.longitude - from.longitude) * t,
        )
    };
    let shape = vec![from, lerp(0.25), lerp(0.5), lerp(0.75), to];
    let distance = from.distance_m(&to);
    let maneuver = Maneuver::basic(distance, format!("Continue on {street}"), distance / 13.4)
        .with_kind(ManeuverKind::Turn, Some(TurnDirection::Right))
        .with_street(street);
    Arc::new(Step::from_shape(shape, maneuver).expect("demo step shape"))
}

fn leg(from: Coordinate, to: Coordinate, streets: [&str; 2]) -> Arc<Leg> {
    let mid = c(
        (from.latitude + to.latitude) / 2.0,
        (from.longitude + to.longitude) / 2.0,
    );
    Arc::new(
        Leg::new(vec![step(from, mid, streets[0]), step(mid, to, streets[1])])
            .expect("demo leg"),
    )
}

async fn wait_for_phase(
    rx: &mut tokio::sync::watch::Receiver<NavSnapshot>,
    phase: NavPhase,
) {
    while rx.borrow().phase != phase {
        rx.changed().await.expect("session ended");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Two-leg trip: home -> cafe -> office, on a simple west-to-east grid.
    let home = c(0.0, 0.0);
    let cafe = c(0.0, 0.1);
    let office = c(0.0, 0.2);
    let route = Route::from_legs(vec![
        leg(home, cafe, ["Elm Street", "Oak Avenue"]),
        leg(cafe, office, ["Bay Road", "Harbor Drive"]),
    ])
    .expect("demo route");
    let trip = Trip::new(route, vec![]);

    // Scripted answer for the off-route excursion: rejoin Oak Avenue and
    // carry on to the cafe.
    let provider = MockRoutingProvider::new();
    let rejoin = c(0.003, 0.06);
    provider.enqueue_route(
        Route::from_legs(vec![
            leg(rejoin, c(0.0, 0.08), ["Mill Lane", "Mill Lane"]),
            leg(c(0.0, 0.08), cafe, ["Oak Avenue", "Oak Avenue"]),
        ])
        .expect("demo correction route"),
    );

    let handle = NavigationSession::spawn(provider, ProgressConfig::default(), trip);

    // Log every published snapshot.
    let mut log_rx = handle.subscribe();
    tokio::spawn(async move {
        loop {
            {
                let snapshot = log_rx.borrow_and_update();
                info!(
                    phase = ?snapshot.phase,
                    leg = ?snapshot.leg_index,
                    instruction = snapshot.instruction.as_deref().unwrap_or(""),
                    remaining_m = ?snapshot.remaining_distance_m,
                    "snapshot"
                );
            }
            if log_rx.changed().await.is_err() {
                break;
            }
        }
    });

    let mut rx = handle.subscribe();
    handle.start().await;

    // Leg 0: two clean samples, then a drift north of the route that
    // trips the off-route debounce and pulls in the scripted correction.
    let drive_out = [
        c(0.0002, 0.025),
        c(0.0002, 0.05),
        c(0.003, 0.055),
        c(0.003, 0.06),
    ];
    for position in drive_out {
        handle.report_location(LocationSample::at(position)).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // Back on the corrected path, through to the cafe.
    for position in [c(0.0015, 0.07), c(0.0002, 0.08), c(0.0002, 0.1)] {
        handle.report_location(LocationSample::at(position)).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    wait_for_phase(&mut rx, NavPhase::LegComplete).await;
    info!("reached the cafe, continuing");
    handle.advance_leg().await;

    // Leg 1 straight through to the office.
    for position in [c(0.0002, 0.125), c(0.0002, 0.15), c(0.0002, 0.175), c(0.0002, 0.2)] {
        handle.report_location(LocationSample::at(position)).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    wait_for_phase(&mut rx, NavPhase::Finished).await;

    let final_snapshot = rx.borrow().clone();
    info!(
        legs = ?final_snapshot.route.as_ref().map(|r| r.legs().len()),
        "arrived at the office"
    );
}
