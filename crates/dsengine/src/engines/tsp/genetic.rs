use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{Algorithm, City, Solution, nearest_neighbor, tour_length};

/// Seed used when a caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Tuning knobs for the genetic search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticParams {
    /// Individuals per generation.
    pub population: usize,
    /// Generations to run.
    pub generations: u64,
    /// Contestants per tournament selection.
    pub tournament: usize,
    /// Chance that a child gets one random swap.
    pub mutation_rate: f64,
    /// Best individuals copied unchanged into the next generation.
    pub elites: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population: 60,
            generations: 200,
            tournament: 3,
            mutation_rate: 0.2,
            elites: 2,
        }
    }
}

/// A candidate tour with its cached length.
#[derive(Debug, Clone)]
struct Individual {
    /// Visiting order.
    route: Vec<usize>,
    /// Closed tour length.
    length: f64,
}

impl Individual {
    /// Measure a route.
    fn new(cities: &[City], route: Vec<usize>) -> Self {
        let length = tour_length(cities, &route);
        Self { route, length }
    }
}

impl GeneticParams {
    /// Evolve a population seeded with the nearest-neighbour tour.
    ///
    /// Elitism keeps the best tour found so far, so the result is never
    /// longer than the greedy one. The same seed gives the same result.
    pub fn run(&self, cities: &[City], seed: u64) -> Solution {
        let greedy = nearest_neighbor(cities);
        let n = cities.len();
        // Every tour of three or fewer cities has the same length.
        if n <= 3 {
            return Solution::new(cities, greedy.best_route, 0, Algorithm::Genetic);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let population = self.population.max(self.elites + 1).max(2);
        let mut pop = Vec::with_capacity(population);
        pop.push(Individual::new(cities, greedy.best_route));
        while pop.len() < population {
            let mut route: Vec<usize> = (0..n).collect();
            route.shuffle(&mut rng);
            pop.push(Individual::new(cities, route));
        }

        for _ in 0..self.generations {
            pop.sort_by(|a, b| a.length.total_cmp(&b.length));
            let mut next: Vec<Individual> = pop.iter().take(self.elites).cloned().collect();
            while next.len() < population {
                let a = self.select(&pop, &mut rng);
                let b = self.select(&pop, &mut rng);
                let mut child = order_crossover(&a.route, &b.route, &mut rng);
                if rng.gen_bool(self.mutation_rate.clamp(0.0, 1.0)) {
                    let i = rng.gen_range(0..n);
                    let j = rng.gen_range(0..n);
                    child.swap(i, j);
                }
                next.push(Individual::new(cities, child));
            }
            pop = next;
        }

        let best = pop
            .into_iter()
            .min_by(|a, b| a.length.total_cmp(&b.length))
            .map(|b| b.route)
            .unwrap_or_default();
        Solution::new(cities, rotate_to_start(best), self.generations, Algorithm::Genetic)
    }

    /// Shortest of a few random picks.
    fn select<'a>(&self, pop: &'a [Individual], rng: &mut StdRng) -> &'a Individual {
        let mut best = &pop[rng.gen_range(0..pop.len())];
        for _ in 1..self.tournament {
            let other = &pop[rng.gen_range(0..pop.len())];
            if other.length < best.length {
                best = other;
            }
        }
        best
    }
}

/// Order crossover: copy a random slice of `a`, then fill the remaining
/// positions with the missing cities in the order they appear in `b`.
fn order_crossover(a: &[usize], b: &[usize], rng: &mut StdRng) -> Vec<usize> {
    let n = a.len();
    let (mut lo, mut hi) = (rng.gen_range(0..n), rng.gen_range(0..n));
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; n];
    for i in lo..=hi {
        child[i] = a[i];
        used[a[i]] = true;
    }
    let mut fill = b.iter().copied().filter(|c| !used[*c]);
    for slot in child.iter_mut().filter(|s| **s == usize::MAX) {
        if let Some(c) = fill.next() {
            *slot = c;
        }
    }
    child
}

/// Rotate a tour so it starts at city 0. The closed length is unchanged.
fn rotate_to_start(mut route: Vec<usize>) -> Vec<usize> {
    if let Some(at) = route.iter().position(|&c| c == 0) {
        route.rotate_left(at);
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> Vec<City> {
        // Points on a circle, listed in a scrambled order.
        (0..n)
            .map(|i| {
                let k = (i * 7) % n;
                let t = k as f64 / n as f64 * std::f64::consts::TAU;
                City::at(t.cos() * 10.0, t.sin() * 10.0)
            })
            .collect()
    }

    #[test]
    fn deterministic_for_a_seed() {
        let cities = ring(12);
        let p = GeneticParams::default();
        assert_eq!(p.run(&cities, 5), p.run(&cities, 5));
    }

    #[test]
    fn never_worse_than_greedy() {
        let cities = ring(12);
        let greedy = nearest_neighbor(&cities).best_distance;
        let s = GeneticParams::default().run(&cities, DEFAULT_SEED);
        assert!(s.best_distance <= greedy + 1e-9);
        assert!(s.heuristic);
        assert_eq!(s.iterations, 200);
        assert_eq!(s.best_route[0], 0);

        let mut sorted = s.best_route.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn crossover_yields_a_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let a: Vec<usize> = (0..9).collect();
        let b: Vec<usize> = (0..9).rev().collect();
        for _ in 0..50 {
            let mut child = order_crossover(&a, &b, &mut rng);
            child.sort_unstable();
            assert_eq!(child, a);
        }
    }

    #[test]
    fn small_inputs() {
        let s = GeneticParams::default().run(&[], 1);
        assert!(s.best_route.is_empty());
        let s = GeneticParams::default().run(&[City::at(0.0, 0.0), City::at(1.0, 0.0)], 1);
        assert_eq!(s.best_route, vec![0, 1]);
    }
}
