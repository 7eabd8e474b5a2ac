//! Single-writer navigation session.
//!
//! All mutable navigation state (trip, current leg/step, off-route
//! counter, reroute tokens) lives inside one tokio task. Commands,
//! location samples, and reroute results funnel through one mpsc channel,
//! so partial updates can never interleave. Provider calls run on spawned
//! tasks and post their results back through the same channel, stamped
//! with a monotonically increasing token; a result is discarded when a
//! newer request has been issued since (last request wins).

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::format::{
    distance_to_next_maneuver_m, remaining_distance_m, remaining_time_s, step_instruction,
};
use crate::geo::Coordinate;
use crate::model::{Leg, Route, Step, Stop, Trip};
use crate::progress::{
    OffRouteCheck, ProgressConfig, determine_current_step, is_destination_reached,
    off_route_check,
};
use crate::provider::{Profile, ProviderError, RoutingProvider};
use crate::reroute::{apply_correction, apply_stop_insertion, correction_waypoints, insertion_waypoints};

use super::{LocationSample, MapMarker, MarkerIcon, NavPhase, NavSnapshot};

/// Commands, samples, and posted-back reroute results. Everything the
/// session reacts to arrives as one of these.
enum Command {
    SetTrip(Trip),
    Start,
    Cancel,
    AdvanceLeg,
    AdvanceStep,
    InsertStop(Stop),
    Location(LocationSample),
    RerouteResult(RerouteOutcome),
}

/// Context captured when a reroute request was issued, so the result can
/// be applied against the state the request was planned for.
enum RerouteRequest {
    Correction { target: Arc<Leg>, position: Coordinate },
    StopInsertion { target_start: Coordinate, stop: Stop, position: Coordinate },
}

struct RerouteOutcome {
    token: u64,
    request: RerouteRequest,
    result: Result<Route, ProviderError>,
}

/// Caller-facing handle to a spawned session. Cheap to clone; dropping
/// every handle closes the command channel and ends the session task.
#[derive(Clone)]
pub struct NavigationHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<NavSnapshot>,
}

impl NavigationHandle {
    /// Replace the trip. Valid while idle, previewing, or finished.
    pub async fn set_trip(&self, trip: Trip) {
        self.send(Command::SetTrip(trip)).await;
    }

    /// Begin navigating the current trip from its first leg.
    pub async fn start(&self) {
        self.send(Command::Start).await;
    }

    /// Stop navigating; the trip is kept and can be started again.
    pub async fn cancel(&self) {
        self.send(Command::Cancel).await;
    }

    /// Move to the next leg; also the "continue" command after a leg
    /// completes. Finishes the session on the last leg.
    pub async fn advance_leg(&self) {
        self.send(Command::AdvanceLeg).await;
    }

    /// Manually move to the next step of the current leg.
    pub async fn advance_step(&self) {
        self.send(Command::AdvanceStep).await;
    }

    /// Insert a stop mid-leg at the traveler's current position.
    pub async fn insert_stop(&self, stop: Stop) {
        self.send(Command::InsertStop(stop)).await;
    }

    /// Push one location sample.
    pub async fn report_location(&self, sample: LocationSample) {
        self.send(Command::Location(sample)).await;
    }

    /// Forward every sample of `stream` into the session from a spawned
    /// task. The task ends when the stream or the session does.
    pub fn attach_location_stream<S>(&self, stream: S) -> tokio::task::JoinHandle<()>
    where
        S: Stream<Item = LocationSample> + Send + 'static,
    {
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let mut stream = std::pin::pin!(stream);
            while let Some(sample) = stream.next().await {
                if commands.send(Command::Location(sample)).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Watch receiver for the published render state.
    pub fn subscribe(&self) -> watch::Receiver<NavSnapshot> {
        self.snapshots.clone()
    }

    async fn send(&self, command: Command) {
        // A closed channel means the session task is gone; commands to a
        // dead session are dropped like out-of-phase commands.
        if self.commands.send(command).await.is_err() {
            debug!("command dropped: session task has ended");
        }
    }
}

/// The session task's state. Constructed and consumed by
/// [`NavigationSession::spawn`].
pub struct NavigationSession<P> {
    provider: Arc<P>,
    profile: Profile,
    config: ProgressConfig,
    /// Weak so the session's own task does not keep the channel open after
    /// every handle is gone; spawned reroute tasks upgrade it to post
    /// their results back.
    commands: mpsc::WeakSender<Command>,
    snapshots: watch::Sender<NavSnapshot>,

    trip: Option<Trip>,
    phase: NavPhase,
    leg_index: usize,
    current_step: Option<Arc<Step>>,
    /// Whether the traveler has been matched to any step of the current
    /// leg; controls whether a correction departs from the leg's start.
    reached_first_step: bool,
    last_position: Option<LocationSample>,
    off_route_count: u32,
    /// Token of the most recently issued reroute request. Results carrying
    /// an older token are stale and dropped.
    latest_token: u64,
    reroute_failed: bool,
}

impl<P: RoutingProvider> NavigationSession<P> {
    /// Spawn a session task for `trip` and return its handle. The session
    /// starts in the previewing phase.
    pub fn spawn(provider: P, config: ProgressConfig, trip: Trip) -> NavigationHandle {
        Self::spawn_with_profile(provider, config, trip, Profile::default())
    }

    /// As [`NavigationSession::spawn`], with an explicit travel profile
    /// for reroute requests.
    pub fn spawn_with_profile(
        provider: P,
        config: ProgressConfig,
        trip: Trip,
        profile: Profile,
    ) -> NavigationHandle {
        let (commands, receiver) = mpsc::channel(64);
        let (snapshots, snapshot_rx) = watch::channel(NavSnapshot::default());

        let mut session = NavigationSession {
            provider: Arc::new(provider),
            profile,
            config,
            commands: commands.downgrade(),
            snapshots,
            trip: None,
            phase: NavPhase::Idle,
            leg_index: 0,
            current_step: None,
            reached_first_step: false,
            last_position: None,
            off_route_count: 0,
            latest_token: 0,
            reroute_failed: false,
        };
        session.assign_trip(trip);
        session.publish();

        tokio::spawn(session.run(receiver));

        NavigationHandle {
            commands,
            snapshots: snapshot_rx,
        }
    }

    async fn run(mut self, mut receiver: mpsc::Receiver<Command>) {
        while let Some(command) = receiver.recv().await {
            match command {
                Command::SetTrip(trip) => self.handle_set_trip(trip),
                Command::Start => self.handle_start(),
                Command::Cancel => self.handle_cancel(),
                Command::AdvanceLeg => self.handle_advance_leg(),
                Command::AdvanceStep => self.handle_advance_step(),
                Command::InsertStop(stop) => self.handle_insert_stop(stop),
                Command::Location(sample) => self.handle_location(sample),
                Command::RerouteResult(outcome) => self.handle_reroute_result(outcome),
            }
            self.publish();
        }
    }

    fn handle_set_trip(&mut self, trip: Trip) {
        match self.phase {
            NavPhase::Idle | NavPhase::Previewing | NavPhase::Finished => {
                self.assign_trip(trip);
                info!(phase = ?self.phase, "trip set");
            }
            _ => debug!(phase = ?self.phase, "set_trip ignored while navigating"),
        }
    }

    fn assign_trip(&mut self, trip: Trip) {
        self.trip = Some(trip);
        self.phase = NavPhase::Previewing;
        self.leg_index = 0;
        self.current_step = None;
        self.reached_first_step = false;
        self.last_position = None;
        self.off_route_count = 0;
        self.reroute_failed = false;
    }

    fn handle_start(&mut self) {
        if self.phase != NavPhase::Previewing {
            debug!(phase = ?self.phase, "start ignored");
            return;
        }
        self.phase = NavPhase::Navigating;
        self.leg_index = 0;
        self.current_step = None;
        self.reached_first_step = false;
        self.off_route_count = 0;
        self.reroute_failed = false;
        info!("navigation started");
    }

    fn handle_cancel(&mut self) {
        match self.phase {
            NavPhase::Navigating | NavPhase::LegComplete => {
                self.phase = NavPhase::Previewing;
                self.leg_index = 0;
                self.current_step = None;
                self.reached_first_step = false;
                self.off_route_count = 0;
                self.reroute_failed = false;
                info!("navigation cancelled");
            }
            _ => debug!(phase = ?self.phase, "cancel ignored"),
        }
    }

    fn handle_advance_leg(&mut self) {
        if !matches!(self.phase, NavPhase::Navigating | NavPhase::LegComplete) {
            debug!(phase = ?self.phase, "advance_leg ignored");
            return;
        }
        let Some(trip) = &self.trip else { return };

        if self.leg_index + 1 < trip.route().legs().len() {
            self.leg_index += 1;
            self.current_step = None;
            self.reached_first_step = false;
            self.off_route_count = 0;
            self.phase = NavPhase::Navigating;
            info!(leg = self.leg_index, "advanced to next leg");
        } else {
            self.phase = NavPhase::Finished;
            info!("last leg complete, navigation finished");
        }
    }

    fn handle_advance_step(&mut self) {
        if self.phase != NavPhase::Navigating {
            debug!(phase = ?self.phase, "advance_step ignored");
            return;
        }
        let Some(leg) = self.current_leg() else { return };

        let next = match &self.current_step {
            None => leg.steps().first().cloned(),
            Some(current) => leg.step_after(current),
        };
        if let Some(step) = next {
            self.current_step = Some(step);
            self.reached_first_step = true;
            info!("advanced to next step");
        } else {
            debug!("advance_step ignored at final step");
        }
    }

    fn handle_location(&mut self, sample: LocationSample) {
        if self.phase != NavPhase::Navigating {
            debug!(phase = ?self.phase, "location sample ignored");
            return;
        }
        let last_accepted = self.last_position.map(|s| s.coordinate);
        if !sample.is_significant(last_accepted.as_ref(), &self.config) {
            debug!("insignificant location sample ignored");
            return;
        }
        self.last_position = Some(sample);

        let Some(leg) = self.current_leg() else { return };

        if is_destination_reached(&leg, &sample.coordinate, &self.config) {
            let last_leg = self
                .trip
                .as_ref()
                .is_some_and(|t| self.leg_index + 1 >= t.route().legs().len());
            self.phase = if last_leg {
                NavPhase::Finished
            } else {
                NavPhase::LegComplete
            };
            info!(leg = self.leg_index, phase = ?self.phase, "leg destination reached");
            return;
        }

        if let Some(step) = determine_current_step(&leg, &sample.coordinate, &self.config) {
            self.current_step = Some(step);
            self.reached_first_step = true;
            self.off_route_count = 0;
            self.reroute_failed = false;
            return;
        }

        match off_route_check(&leg, &sample.coordinate, sample.heading, &self.config) {
            // Plausibly still near the path; treat as sensor noise.
            OffRouteCheck::Tolerated => {}
            OffRouteCheck::OffRoute => {
                self.off_route_count += 1;
                debug!(count = self.off_route_count, "off-route sample");
                if self.off_route_count >= self.config.off_route_debounce {
                    self.off_route_count = 0;
                    self.issue_correction(leg, sample.coordinate);
                }
            }
        }
    }

    fn handle_insert_stop(&mut self, stop: Stop) {
        if self.phase != NavPhase::Navigating {
            debug!(phase = ?self.phase, "insert_stop ignored");
            return;
        }
        let Some(leg) = self.current_leg() else { return };

        let waypoints = match insertion_waypoints(&leg, &stop) {
            Ok(waypoints) => waypoints,
            Err(e) => {
                warn!(error = %e, "stop insertion abandoned");
                self.reroute_failed = true;
                return;
            }
        };

        let position = self
            .last_position
            .map(|s| s.coordinate)
            .unwrap_or_else(|| leg.start_coordinate());
        let request = RerouteRequest::StopInsertion {
            target_start: leg.start_coordinate(),
            stop,
            position,
        };
        self.issue_request(waypoints, request);
    }

    fn issue_correction(&mut self, leg: Arc<Leg>, position: Coordinate) {
        let waypoints = correction_waypoints(&leg, position, self.reached_first_step);
        info!(?position, "requesting off-route correction");
        self.issue_request(waypoints, RerouteRequest::Correction { target: leg, position });
    }

    /// Spawn the provider call; the result comes back through the command
    /// channel stamped with a fresh token.
    fn issue_request(&mut self, waypoints: Vec<Coordinate>, request: RerouteRequest) {
        self.latest_token += 1;
        let token = self.latest_token;

        let provider = self.provider.clone();
        let profile = self.profile;
        let Some(commands) = self.commands.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            let result = provider
                .calculate_route(&waypoints, profile)
                .await
                .map(|response| response.primary);
            let outcome = RerouteOutcome { token, request, result };
            // Session gone: nothing to apply the result to.
            let _ = commands.send(Command::RerouteResult(outcome)).await;
        });
    }

    fn handle_reroute_result(&mut self, outcome: RerouteOutcome) {
        if outcome.token != self.latest_token {
            warn!(
                token = outcome.token,
                latest = self.latest_token,
                "stale reroute result discarded"
            );
            return;
        }
        if self.phase != NavPhase::Navigating {
            debug!(phase = ?self.phase, "reroute result ignored");
            return;
        }

        let generated = match outcome.result {
            Ok(route) => route,
            Err(e) => {
                warn!(error = %e, "reroute abandoned: route generation failed");
                self.reroute_failed = true;
                return;
            }
        };

        match outcome.request {
            RerouteRequest::Correction { target, position } => {
                let Some(trip) = &self.trip else { return };
                match apply_correction(trip.route(), &target, &generated, &position, &self.config)
                {
                    Ok(correction) => {
                        info!(leg = correction.leg_index, "off-route correction applied");
                        let updated = trip.with_route(correction.route);
                        self.leg_index = correction.leg_index;
                        self.current_step = Some(correction.current_step);
                        self.reached_first_step = true;
                        self.reroute_failed = false;
                        self.trip = Some(updated);
                    }
                    Err(e) => {
                        warn!(error = %e, "off-route correction abandoned");
                        self.reroute_failed = true;
                    }
                }
            }
            RerouteRequest::StopInsertion { target_start, stop, position } => {
                let Some(trip) = &self.trip else { return };
                match apply_stop_insertion(
                    trip,
                    target_start,
                    &generated,
                    stop,
                    &position,
                    &self.config,
                ) {
                    Ok(insertion) => {
                        info!(leg = insertion.leg_index, "stop inserted");
                        self.leg_index = insertion.leg_index;
                        self.reached_first_step = insertion.current_step.is_some();
                        self.current_step = insertion.current_step;
                        self.reroute_failed = false;
                        self.trip = Some(insertion.trip);
                    }
                    Err(e) => {
                        warn!(error = %e, "stop insertion abandoned");
                        self.reroute_failed = true;
                    }
                }
            }
        }
    }

    fn current_leg(&self) -> Option<Arc<Leg>> {
        self.trip
            .as_ref()?
            .route()
            .legs()
            .get(self.leg_index)
            .cloned()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    fn snapshot(&self) -> NavSnapshot {
        let Some(trip) = &self.trip else {
            return NavSnapshot::default();
        };

        let navigating = matches!(
            self.phase,
            NavPhase::Navigating | NavPhase::LegComplete | NavPhase::Finished
        );

        let mut markers: Vec<MapMarker> = trip
            .stops()
            .iter()
            .filter_map(|stop| {
                stop.coordinate.map(|coordinate| MapMarker {
                    coordinate,
                    title: stop.name.clone(),
                    icon: MarkerIcon::Pin,
                })
            })
            .collect();

        if let Some(step) = &self.current_step {
            for intersection in &step.maneuver().intersections {
                if intersection.traffic_signal {
                    markers.push(MapMarker {
                        coordinate: intersection.coordinate,
                        title: "Traffic signal".to_string(),
                        icon: MarkerIcon::TrafficSignal,
                    });
                }
                if intersection.stop_sign {
                    markers.push(MapMarker {
                        coordinate: intersection.coordinate,
                        title: "Stop sign".to_string(),
                        icon: MarkerIcon::StopSign,
                    });
                }
            }
        }

        let polylines = trip
            .route()
            .legs()
            .iter()
            .map(|leg| leg.full_shape())
            .collect();

        let leg = self.current_leg();
        let (remaining_distance, remaining_time) = match (&leg, &self.current_step) {
            (Some(leg), Some(step)) => (
                Some(remaining_distance_m(leg, step)),
                Some(remaining_time_s(leg, step)),
            ),
            _ => (None, None),
        };

        let distance_to_maneuver = self.current_step.as_ref().map(|step| {
            match &self.last_position {
                Some(sample) => distance_to_next_maneuver_m(step, &sample.coordinate),
                None => step.maneuver().distance_m,
            }
        });

        let instruction = match (&self.current_step, distance_to_maneuver) {
            (Some(step), Some(distance)) => Some(step_instruction(step, distance)),
            _ => None,
        };

        NavSnapshot {
            phase: self.phase,
            route: Some(trip.route().clone()),
            leg_index: navigating.then_some(self.leg_index),
            current_step: self.current_step.clone(),
            markers,
            polylines,
            distance_to_next_maneuver_m: distance_to_maneuver,
            remaining_distance_m: remaining_distance,
            remaining_time_s: remaining_time,
            instruction,
            destination_reached: matches!(
                self.phase,
                NavPhase::LegComplete | NavPhase::Finished
            ),
            reroute_failed: self.reroute_failed,
        }
    }
}
