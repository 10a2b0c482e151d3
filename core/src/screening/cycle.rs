use crate::catalog::{Conjunction, TrackedObject};
use crate::prelude::{ScreeningConfig, ScreeningError, ScreeningResult};
use crate::resolver::OrbitalStateResolver;
use crate::screening::cache::TrajectoryCache;
use crate::screening::filter::CandidateFilter;
use crate::screening::registry::ConjunctionRegistry;
use crate::screening::risk::RiskClassifier;
use crate::screening::search::ClosestApproachSearch;
use crate::telemetry::log::LogManager;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleStatus {
    Complete,
    /// The wall-clock budget ran out; results are valid but incomplete.
    Partial,
}

/// Ranked output of one detection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Unix seconds the cycle's time offsets are measured from.
    pub epoch: f64,
    pub status: CycleStatus,
    pub conjunctions: Vec<Conjunction>,
    pub objects: usize,
    pub excluded_objects: usize,
    pub pairs_considered: usize,
    pub candidate_pairs: usize,
    pub pairs_evaluated: usize,
    pub unresolved_samples: usize,
    /// Qualifying conjunctions before truncation.
    pub qualifying: usize,
    pub elapsed_ms: u64,
}

impl CycleReport {
    pub fn is_partial(&self) -> bool {
        self.status == CycleStatus::Partial
    }

    pub fn conjunction(&self, index: usize) -> Option<&Conjunction> {
        self.conjunctions.get(index)
    }

    pub fn to_json(&self) -> ScreeningResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ScreeningError::Internal(format!("serializing cycle report: {err}")))
    }
}

#[derive(Default)]
struct PairShard {
    conjunctions: Vec<Conjunction>,
    evaluated: usize,
    unresolved: usize,
    interrupted: bool,
}

/// One stateless pass over a catalog snapshot: gate, sample, classify, rank.
pub struct DetectionCycle<R> {
    config: ScreeningConfig,
    resolver: R,
    pool: ThreadPool,
    logger: LogManager,
}

impl<R> DetectionCycle<R>
where
    R: OrbitalStateResolver + Sync,
{
    pub fn new(config: ScreeningConfig, resolver: R) -> ScreeningResult<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("screening-{index}"))
            .build()
            .map_err(|err| ScreeningError::Internal(format!("building worker pool: {err}")))?;
        Ok(Self {
            config,
            resolver,
            pool,
            logger: LogManager::new("detection"),
        })
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn run(&self, objects: &[TrackedObject], epoch: f64) -> ScreeningResult<CycleReport> {
        let started = Instant::now();
        let deadline = self.config.budget().map(|budget| started + budget);

        let candidates =
            CandidateFilter::new(self.config.altitude_gate_km).candidate_pairs(objects);
        for &index in &candidates.excluded {
            self.logger.detail(&format!(
                "excluding {} from cycle: no usable altitude",
                objects[index].id
            ));
        }

        let search = ClosestApproachSearch::from_config(&self.config);
        let cache = TrajectoryCache::with_len(objects.len());
        let pair_shards = self.shard(&candidates.pairs, |chunk| {
            self.evaluate_shard(chunk, objects, &cache, &search, deadline, epoch)
        });

        let mut registry = ConjunctionRegistry::new(self.config.max_results);
        let mut interrupted = false;
        let mut pairs_evaluated = 0;
        let mut unresolved_samples = 0;
        for evaluated in pair_shards {
            interrupted |= evaluated.interrupted;
            pairs_evaluated += evaluated.evaluated;
            unresolved_samples += evaluated.unresolved;
            registry.extend(evaluated.conjunctions);
        }

        let qualifying = registry.len();
        let status = if interrupted {
            CycleStatus::Partial
        } else {
            CycleStatus::Complete
        };
        let report = CycleReport {
            epoch,
            status,
            conjunctions: registry.into_ranked(),
            objects: objects.len(),
            excluded_objects: candidates.excluded.len(),
            pairs_considered: candidates.pairs_considered,
            candidate_pairs: candidates.pairs.len(),
            pairs_evaluated,
            unresolved_samples,
            qualifying,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if report.is_partial() {
            self.logger.warn(&format!(
                "budget exhausted after {} of {} candidate pairs ({} objects resolved)",
                report.pairs_evaluated,
                report.candidate_pairs,
                cache.resolved()
            ));
        }
        self.logger.record(&format!(
            "cycle {:?}: objects {}, candidates {}/{}, qualifying {}, reported {}, unresolved samples {}, {} ms",
            report.status,
            report.objects,
            report.candidate_pairs,
            report.pairs_considered,
            report.qualifying,
            report.conjunctions.len(),
            report.unresolved_samples,
            report.elapsed_ms
        ));

        Ok(report)
    }

    /// Splits `items` into contiguous ranges, one per worker, and maps `work`
    /// over them on the cycle's pool. Results keep the order of the ranges.
    fn shard<T, O, F>(&self, items: &[T], work: F) -> Vec<O>
    where
        T: Sync,
        O: Send,
        F: Fn(&[T]) -> O + Sync + Send,
    {
        if items.is_empty() {
            return Vec::new();
        }
        let chunk_size = items.len().div_ceil(self.config.workers);
        self.pool
            .install(|| items.par_chunks(chunk_size).map(|chunk| work(chunk)).collect())
    }

    fn evaluate_shard(
        &self,
        pairs: &[(usize, usize)],
        objects: &[TrackedObject],
        cache: &TrajectoryCache,
        search: &ClosestApproachSearch,
        deadline: Option<Instant>,
        epoch: f64,
    ) -> PairShard {
        let mut shard = PairShard::default();
        let trajectory = move |index: usize| {
            cache.get_or_resolve(index, || search.trajectory(&self.resolver, &objects[index]))
        };

        for &(i, j) in pairs {
            if expired(deadline) {
                shard.interrupted = true;
                break;
            }
            let (Some(first), Some(second)) = (trajectory(i), trajectory(j)) else {
                continue;
            };

            let outcome = search.closest(first, second);
            shard.evaluated += 1;
            shard.unresolved += outcome.unresolved_samples;

            let Some(approach) = outcome.approach else {
                continue;
            };
            if approach.miss_distance_km >= self.config.detection_threshold_km {
                continue;
            }
            let risk_tier = RiskClassifier::classify(approach.miss_distance_km);
            if !RiskClassifier::is_reportable(risk_tier) {
                continue;
            }

            let (primary, secondary) = (&objects[i], &objects[j]);
            shard.conjunctions.push(Conjunction {
                primary_id: primary.id.clone(),
                primary_name: primary.name.clone(),
                secondary_id: secondary.id.clone(),
                secondary_name: secondary.name.clone(),
                miss_distance_km: approach.miss_distance_km,
                relative_velocity_km_s: approach.relative_velocity_km_s,
                time_to_closest_approach_min: approach.minutes,
                timestamp: epoch + approach.minutes * 60.0,
                risk_tier,
                collision_point: approach.collision_point,
            });
        }

        shard
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.map_or(false, |deadline| Instant::now() >= deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{OrbitDescriptor, RiskTier};
    use crate::math::Vec3;
    use crate::resolver::{CircularOrbitResolver, StateVector};
    use std::thread;
    use std::time::Duration;

    /// Head-on traffic: "east"/"west" meet 0.05 km apart at minute 12.
    /// `crossN` objects each meet their `crossN-b` partner at minute N.
    struct ScriptedResolver;

    impl OrbitalStateResolver for ScriptedResolver {
        fn resolve(&self, object: &TrackedObject, minutes_ahead: f64) -> Option<StateVector> {
            let id = object.id.as_str();
            let (meet_minute, offset, sign) = match id {
                "east" => (12.0, Vec3::ZERO, 1.0),
                "west" => (12.0, Vec3::new(0.0, 0.05, 0.0), -1.0),
                "unresolvable" => return None,
                _ => {
                    let (base, partner) = match id.strip_suffix("-b") {
                        Some(base) => (base, true),
                        None => (id, false),
                    };
                    let minute: f64 = base.strip_prefix("cross")?.parse().ok()?;
                    // Spread each crossing pair far from every other pair.
                    let lane = Vec3::new(0.0, 0.0, minute * 1000.0);
                    if partner {
                        (minute, lane + Vec3::new(0.0, 0.2, 0.0), -1.0)
                    } else {
                        (minute, lane, 1.0)
                    }
                }
            };
            let seconds = (minutes_ahead - meet_minute) * 60.0;
            Some(StateVector::new(
                offset + Vec3::new(sign * 4.0 * seconds, 0.0, 0.0),
                Vec3::new(sign * 4.0, 0.0, 0.0),
            ))
        }
    }

    fn cycle(config: ScreeningConfig) -> DetectionCycle<ScriptedResolver> {
        DetectionCycle::new(config, ScriptedResolver).unwrap()
    }

    #[test]
    fn head_on_pair_reports_single_critical_conjunction() {
        let objects = vec![
            TrackedObject::new("east", "eastbound", 550.0),
            TrackedObject::new("west", "westbound", 551.0),
        ];
        let report = cycle(ScreeningConfig::default())
            .run(&objects, 1_700_000_000.0)
            .unwrap();

        assert_eq!(report.status, CycleStatus::Complete);
        assert_eq!(report.conjunctions.len(), 1);
        let conjunction = &report.conjunctions[0];
        assert_eq!(conjunction.risk_tier, RiskTier::Critical);
        assert_eq!(conjunction.time_to_closest_approach_min, 12.0);
        assert_eq!(conjunction.relative_velocity_km_s, 8.0);
        assert!((conjunction.miss_distance_km - 0.05).abs() < 1e-9);
        assert_eq!(conjunction.timestamp, 1_700_000_000.0 + 720.0);
        assert_eq!(conjunction.primary_id, "east");
    }

    #[test]
    fn altitude_gate_blocks_pair_regardless_of_trajectory() {
        let objects = vec![
            TrackedObject::new("east", "eastbound", 550.0),
            TrackedObject::new("west", "westbound", 700.0),
        ];
        let report = cycle(ScreeningConfig::default()).run(&objects, 0.0).unwrap();

        assert!(report.conjunctions.is_empty());
        assert_eq!(report.candidate_pairs, 0);
        assert_eq!(report.pairs_evaluated, 0);
        assert_eq!(report.status, CycleStatus::Complete);
    }

    #[test]
    fn ranking_is_soonest_first_and_bounded() {
        let mut objects = Vec::new();
        for minute in [25, 3, 17, 9, 21, 6, 14] {
            objects.push(TrackedObject::new(format!("cross{minute}"), "a", 500.0));
            objects.push(TrackedObject::new(format!("cross{minute}-b"), "b", 505.0));
        }

        let report = cycle(ScreeningConfig::default()).run(&objects, 0.0).unwrap();
        let minutes: Vec<f64> = report
            .conjunctions
            .iter()
            .map(|c| c.time_to_closest_approach_min)
            .collect();

        assert_eq!(report.qualifying, 7);
        assert_eq!(minutes, vec![3.0, 6.0, 9.0, 14.0, 17.0]);
        assert!(report
            .conjunctions
            .iter()
            .all(|c| c.risk_tier == RiskTier::High));
    }

    #[test]
    fn sharded_run_matches_single_worker() {
        let mut objects = Vec::new();
        for minute in [4, 8, 12, 16, 20, 24, 28] {
            objects.push(TrackedObject::new(format!("cross{minute}"), "a", 500.0));
            objects.push(TrackedObject::new(format!("cross{minute}-b"), "b", 520.0));
        }

        let single = cycle(ScreeningConfig::default()).run(&objects, 0.0).unwrap();
        let sharded = cycle(ScreeningConfig {
            workers: 4,
            ..Default::default()
        })
        .run(&objects, 0.0)
        .unwrap();

        assert_eq!(single.conjunctions, sharded.conjunctions);
        assert_eq!(single.pairs_evaluated, sharded.pairs_evaluated);
        assert_eq!(sharded.pairs_evaluated, 91);
    }

    #[test]
    fn malformed_and_unresolvable_objects_do_not_abort() {
        let mut broken = TrackedObject::new("cross5", "broken", 0.0);
        broken.altitude_km = None;
        let objects = vec![
            broken,
            TrackedObject::new("unresolvable", "dark", 551.0),
            TrackedObject::new("east", "eastbound", 550.0),
            TrackedObject::new("west", "westbound", 552.0),
        ];

        let report = cycle(ScreeningConfig::default()).run(&objects, 0.0).unwrap();
        assert_eq!(report.excluded_objects, 1);
        assert_eq!(report.candidate_pairs, 3);
        assert_eq!(report.unresolved_samples, 2 * 31);
        assert_eq!(report.conjunctions.len(), 1);
    }

    #[test]
    fn exhausted_budget_yields_partial_report() {
        let objects = vec![
            TrackedObject::new("east", "eastbound", 550.0),
            TrackedObject::new("west", "westbound", 551.0),
        ];
        let report = cycle(ScreeningConfig {
            budget_ms: Some(0),
            ..Default::default()
        })
        .run(&objects, 0.0)
        .unwrap();

        assert!(report.is_partial());
        assert!(report.conjunctions.is_empty());
    }

    /// Delegates to the scripted tracks but stalls on objects named "slow".
    struct StallingResolver;

    impl OrbitalStateResolver for StallingResolver {
        fn resolve(&self, object: &TrackedObject, minutes_ahead: f64) -> Option<StateVector> {
            if object.name == "slow" {
                thread::sleep(Duration::from_millis(10));
            }
            ScriptedResolver.resolve(object, minutes_ahead)
        }
    }

    #[test]
    fn budget_expiring_mid_cycle_keeps_earlier_conjunctions() {
        let mut objects = vec![
            TrackedObject::new("east", "eastbound", 550.0),
            TrackedObject::new("west", "westbound", 551.0),
        ];
        for n in 0..6 {
            objects.push(TrackedObject::new(format!("drift{n}"), "slow", 552.0));
        }
        let config = ScreeningConfig {
            budget_ms: Some(100),
            ..Default::default()
        };

        let report = DetectionCycle::new(config, StallingResolver)
            .unwrap()
            .run(&objects, 0.0)
            .unwrap();

        // east x west is the first pair; each slow object takes ~310 ms to resolve.
        assert!(report.is_partial());
        assert!(report.pairs_evaluated < report.candidate_pairs);
        assert_eq!(report.conjunctions.len(), 1);
        assert_eq!(report.conjunctions[0].primary_id, "east");
        assert_eq!(report.conjunctions[0].risk_tier, RiskTier::Critical);
    }

    #[test]
    fn empty_catalog_is_a_complete_cycle() {
        let report = cycle(ScreeningConfig::default()).run(&[], 0.0).unwrap();
        assert_eq!(report.status, CycleStatus::Complete);
        assert!(report.conjunctions.is_empty());
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = ScreeningConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(DetectionCycle::new(config, ScriptedResolver).is_err());
    }

    #[test]
    fn crossing_circular_orbits_are_detected() {
        // Equatorial and polar orbits at the same radius meet at the node.
        // Both reach it at minute 10 when phased back by ten minutes of motion.
        let probe = OrbitDescriptor::new(550.0, 0.0, 0.0, 0.0);
        let back = -(probe.mean_motion_rad_s() * 600.0).to_degrees();
        let objects = vec![
            TrackedObject::with_orbit(
                "eq",
                "equatorial",
                OrbitDescriptor::new(550.0, 0.0, back, 0.0),
            ),
            TrackedObject::with_orbit(
                "polar",
                "polar",
                OrbitDescriptor::new(550.02, 90.0, back, 0.0),
            ),
        ];

        let report = DetectionCycle::new(ScreeningConfig::default(), CircularOrbitResolver::new())
            .unwrap()
            .run(&objects, 0.0)
            .unwrap();

        assert_eq!(report.conjunctions.len(), 1);
        let conjunction = &report.conjunctions[0];
        assert_eq!(conjunction.time_to_closest_approach_min, 10.0);
        assert_eq!(conjunction.risk_tier, RiskTier::Critical);
        // Perpendicular planes at ~7.6 km/s give ~10.7 km/s closing speed.
        assert!(conjunction.relative_velocity_km_s > 10.0);
    }

    #[test]
    fn report_serializes_tiers_and_status() {
        let objects = vec![
            TrackedObject::new("east", "eastbound", 550.0),
            TrackedObject::new("west", "westbound", 551.0),
        ];
        let json = cycle(ScreeningConfig::default())
            .run(&objects, 0.0)
            .unwrap()
            .to_json()
            .unwrap();
        assert!(json.contains("\"CRITICAL\""));
        assert!(json.contains("\"COMPLETE\""));
    }
}
