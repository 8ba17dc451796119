//! Travelling-salesman solvers over points in the plane.
//!
//! A route is a permutation of city indices and is implicitly closed: its
//! length includes the leg from the last city back to the first.

/// Population-based search.
mod genetic;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::genetic::{DEFAULT_SEED, GeneticParams};
use crate::{
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
    value::Value,
};

/// Largest city count solved exhaustively. Larger inputs fall back to
/// nearest neighbour.
pub const BRUTE_FORCE_LIMIT: usize = 8;

/// A point to visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    /// Optional caller-supplied identifier, echoed back unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl City {
    /// An anonymous city at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self { id: None, x, y }
    }

    /// Euclidean distance to another city.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Length of the closed tour visiting `route` in order.
pub fn tour_length(cities: &[City], route: &[usize]) -> f64 {
    if route.len() < 2 {
        return 0.0;
    }
    route
        .iter()
        .zip(route.iter().cycle().skip(1))
        .map(|(&a, &b)| cities[a].distance(&cities[b]))
        .sum()
}

/// Available solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Algorithm {
    /// Greedy tour from city 0.
    #[serde(rename = "Nearest Neighbor")]
    NearestNeighbor,
    /// Exhaustive search over every ordering.
    #[serde(rename = "Brute Force")]
    BruteForce,
    /// Population-based search seeded with the greedy tour.
    #[serde(rename = "Genetic Algorithm")]
    Genetic,
}

impl Algorithm {
    /// Display name.
    pub fn display(self) -> &'static str {
        match self {
            Self::NearestNeighbor => "Nearest Neighbor",
            Self::BruteForce => "Brute Force",
            Self::Genetic => "Genetic Algorithm",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nearestneighbor" | "nearestNeighbor" => Ok(Self::NearestNeighbor),
            "bruteforce" | "bruteForce" => Ok(Self::BruteForce),
            "genetic" => Ok(Self::Genetic),
            other => Err(Error::invalid(format!(
                "unknown algorithm '{other}'. Valid options: nearestneighbor, bruteforce, genetic"
            ))),
        }
    }
}

/// Outcome of one solve.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    /// City indices in visiting order.
    pub best_route: Vec<usize>,
    /// Closed tour length.
    pub best_distance: f64,
    /// Work done: cities placed, orderings tried, or generations run.
    pub iterations: u64,
    /// The solver that produced the route.
    pub algorithm: Algorithm,
    /// Whether brute force was requested but the input was too large.
    pub fell_back: bool,
    /// Whether the route is not guaranteed optimal.
    pub heuristic: bool,
}

impl Solution {
    /// Wrap a route, measuring its length.
    fn new(cities: &[City], route: Vec<usize>, iterations: u64, algorithm: Algorithm) -> Self {
        Self {
            best_distance: tour_length(cities, &route),
            best_route: route,
            iterations,
            algorithm,
            fell_back: false,
            heuristic: algorithm != Algorithm::BruteForce,
        }
    }
}

/// Greedy tour: start at city 0 and repeatedly visit the closest unvisited
/// city, preferring the lowest index on ties. *O*(n²).
pub fn nearest_neighbor(cities: &[City]) -> Solution {
    let n = cities.len();
    let mut route = Vec::with_capacity(n);
    if n > 0 {
        let mut visited = vec![false; n];
        let mut current = 0;
        visited[0] = true;
        route.push(0);
        for _ in 1..n {
            let mut best: Option<(usize, f64)> = None;
            for (i, city) in cities.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let d = cities[current].distance(city);
                if best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((i, d));
                }
            }
            let Some((next, _)) = best else { break };
            visited[next] = true;
            route.push(next);
            current = next;
        }
    }
    Solution::new(cities, route, n as u64, Algorithm::NearestNeighbor)
}

/// Rearrange into the next lexicographic permutation. Returns `false` after
/// the last one.
fn next_permutation(p: &mut [usize]) -> bool {
    let Some(i) = p.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(j) = p.iter().rposition(|&x| x > p[i]) else {
        return false;
    };
    p.swap(i, j);
    p[i + 1..].reverse();
    true
}

/// Exhaustive search over all `n!` orderings in lexicographic order,
/// keeping the first strictly shortest. Falls back to nearest neighbour above
/// [`BRUTE_FORCE_LIMIT`] cities.
pub fn brute_force(cities: &[City]) -> Solution {
    let n = cities.len();
    if n > BRUTE_FORCE_LIMIT {
        debug!(
            cities = n,
            limit = BRUTE_FORCE_LIMIT,
            "brute force falling back to nearest neighbour"
        );
        let mut fallback = nearest_neighbor(cities);
        fallback.fell_back = true;
        return fallback;
    }
    if n == 0 {
        return Solution::new(cities, Vec::new(), 0, Algorithm::BruteForce);
    }

    let mut perm: Vec<usize> = (0..n).collect();
    let mut best = perm.clone();
    let mut best_len = tour_length(cities, &perm);
    let mut tried = 1u64;
    while next_permutation(&mut perm) {
        tried += 1;
        let len = tour_length(cities, &perm);
        if len < best_len {
            best_len = len;
            best.clone_from(&perm);
        }
    }
    Solution::new(cities, best, tried, Algorithm::BruteForce)
}

/// Query view of a TSP solver.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TspSnapshot {
    /// Cities of the last solve.
    pub cities: Vec<City>,
    /// Result of the last solve.
    pub last_result: Option<Solution>,
}

/// A TSP solver remembering its most recent problem and answer.
#[derive(Debug, Clone, Default)]
pub struct Tsp {
    /// Cities of the last solve.
    cities: Vec<City>,
    /// Result of the last solve.
    last: Option<Solution>,
}

impl Tsp {
    /// A solver with no problem loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the city set and solve it.
    ///
    /// `seed` only affects [`Algorithm::Genetic`]; it defaults to
    /// [`DEFAULT_SEED`].
    pub fn solve(
        &mut self,
        cities: Vec<City>,
        algorithm: Algorithm,
        seed: Option<u64>,
    ) -> Result<&Solution> {
        if let Some(i) = cities
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(Error::invalid(format!(
                "city {i} has a non-finite coordinate"
            )));
        }
        let solution = match algorithm {
            Algorithm::NearestNeighbor => nearest_neighbor(&cities),
            Algorithm::BruteForce => brute_force(&cities),
            Algorithm::Genetic => {
                GeneticParams::default().run(&cities, seed.unwrap_or(DEFAULT_SEED))
            }
        };
        self.cities = cities;
        Ok(self.last.insert(solution))
    }
}

impl Engine for Tsp {
    const KIND: EngineKind = EngineKind::Tsp;
    type Snapshot = TspSnapshot;

    fn snapshot(&self) -> TspSnapshot {
        TspSnapshot {
            cities: self.cities.clone(),
            last_result: self.last.clone(),
        }
    }

    fn clear(&mut self) {
        self.cities.clear();
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<City> {
        // Corners listed so the greedy tour crosses itself.
        vec![
            City::at(0.0, 0.0),
            City::at(1.0, 1.0),
            City::at(1.0, 0.0),
            City::at(0.0, 1.0),
        ]
    }

    #[test]
    fn degenerate_inputs() {
        for solve in [nearest_neighbor, brute_force] {
            let empty = solve(&[]);
            assert!(empty.best_route.is_empty());
            assert_eq!(empty.best_distance, 0.0);

            let one = solve(&[City::at(3.0, 4.0)]);
            assert_eq!(one.best_route, vec![0]);
            assert_eq!(one.best_distance, 0.0);
        }
    }

    #[test]
    fn two_cities_go_there_and_back() {
        let s = nearest_neighbor(&[City::at(0.0, 0.0), City::at(3.0, 4.0)]);
        assert_eq!(s.best_route, vec![0, 1]);
        assert!((s.best_distance - 10.0).abs() < 1e-9);
    }

    #[test]
    fn brute_force_finds_perimeter() {
        let cities = square();
        let s = brute_force(&cities);
        assert!((s.best_distance - 4.0).abs() < 1e-9);
        assert_eq!(s.best_route, vec![0, 2, 1, 3]);
        assert_eq!(s.iterations, 24);
        assert!(!s.heuristic);
        assert!(nearest_neighbor(&cities).best_distance >= s.best_distance);
    }

    #[test]
    fn nearest_neighbor_prefers_lowest_index_on_ties() {
        // From the origin, cities 1 and 2 are equally close.
        let cities = [City::at(0.0, 0.0), City::at(1.0, 0.0), City::at(-1.0, 0.0)];
        assert_eq!(nearest_neighbor(&cities).best_route, vec![0, 1, 2]);
    }

    #[test]
    fn brute_force_falls_back_above_limit() {
        let cities: Vec<_> = (0..=BRUTE_FORCE_LIMIT)
            .map(|i| City::at(i as f64, (i % 2) as f64))
            .collect();
        let s = brute_force(&cities);
        assert!(s.fell_back);
        assert_eq!(s.algorithm, Algorithm::NearestNeighbor);
        assert_eq!(s.best_route.len(), cities.len());
    }

    #[test]
    fn permutations_are_lexicographic() {
        let mut p = vec![0, 1, 2];
        let mut seen = vec![p.clone()];
        while next_permutation(&mut p) {
            seen.push(p.clone());
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1], vec![0, 2, 1]);
        assert_eq!(seen[5], vec![2, 1, 0]);
    }

    #[test]
    fn algorithm_names() -> Result<()> {
        assert_eq!("bruteForce".parse::<Algorithm>()?, Algorithm::BruteForce);
        assert_eq!("nearestneighbor".parse::<Algorithm>()?, Algorithm::NearestNeighbor);
        assert!("annealing".parse::<Algorithm>().is_err());
        Ok(())
    }

    #[test]
    fn engine_remembers_last_solve() -> Result<()> {
        let mut tsp = Tsp::new();
        let bad = vec![City::at(f64::NAN, 0.0)];
        assert!(tsp.solve(bad, Algorithm::NearestNeighbor, None).is_err());
        assert_eq!(tsp.snapshot().last_result, None);

        let d = tsp.solve(square(), Algorithm::Genetic, Some(7))?.best_distance;
        assert!((d - 4.0).abs() < 1e-9);
        assert_eq!(tsp.snapshot().cities.len(), 4);
        Ok(())
    }
}
