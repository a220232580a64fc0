//! Genetic packer: searches over placement orderings and rotation masks,
//! decoding each chromosome through the guillotine shelf packer.
//!
//! The first individual is the guillotine's own ordering with no forced
//! rotations, so the search can never end up behind the plain heuristic.
//! The RNG is seeded from the settings, making runs reproducible.

use rand::prelude::*;
use rand::rngs::StdRng;

use slabcut_model::{CutSettings, OptimizeResult, StockSheet};

use crate::guillotine::{packing_order, PartUnit};
use crate::optimizer::{pack_all, PackOutcome};

/// Chromosome fitness: higher score wins, ties go to the layout using less
/// shelf height.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fitness {
    score: f64,
    used_height: f64,
}

impl Fitness {
    const WORST: Fitness = Fitness {
        score: f64::NEG_INFINITY,
        used_height: f64::INFINITY,
    };

    fn better_than(&self, other: &Fitness) -> bool {
        if self.score != other.score {
            self.score > other.score
        } else {
            self.used_height < other.used_height
        }
    }
}

/// Placement order plus a pre-rotation flag per unit.
#[derive(Debug, Clone)]
struct Chromosome {
    order: Vec<usize>,
    rotations: Vec<bool>,
    fitness: Fitness,
}

impl Chromosome {
    fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        let rotations = (0..n).map(|_| rng.gen()).collect();
        Self {
            order,
            rotations,
            fitness: Fitness::WORST,
        }
    }

    /// Order crossover (OX1) on the permutation, uniform crossover on the
    /// rotation mask.
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        let n = self.order.len();
        if n < 2 {
            return self.clone();
        }

        let (mut p1, mut p2) = (rng.gen_range(0..n), rng.gen_range(0..n));
        if p1 > p2 {
            std::mem::swap(&mut p1, &mut p2);
        }

        let mut child_order = vec![usize::MAX; n];
        let mut used = vec![false; n];
        for i in p1..=p2 {
            child_order[i] = self.order[i];
            used[self.order[i]] = true;
        }

        let mut j = (p2 + 1) % n;
        for i in 0..n {
            let idx = (p2 + 1 + i) % n;
            if child_order[idx] == usize::MAX {
                while used[other.order[j]] {
                    j = (j + 1) % n;
                }
                child_order[idx] = other.order[j];
                used[other.order[j]] = true;
                j = (j + 1) % n;
            }
        }

        let rotations = self
            .rotations
            .iter()
            .zip(&other.rotations)
            .map(|(a, b)| if rng.gen() { *a } else { *b })
            .collect();

        Self {
            order: child_order,
            rotations,
            fitness: Fitness::WORST,
        }
    }

    /// Per-gene mutation: swap on the permutation, bit-flip on the mask.
    fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        let n = self.order.len();
        if n >= 2 {
            for i in 0..n {
                if rng.gen::<f64>() < rate {
                    let j = rng.gen_range(0..n);
                    self.order.swap(i, j);
                    self.fitness = Fitness::WORST;
                }
            }
        }
        for i in 0..self.rotations.len() {
            if rng.gen::<f64>() < rate {
                self.rotations[i] = !self.rotations[i];
                self.fitness = Fitness::WORST;
            }
        }
    }
}

/// Result of a genetic search, with the per-generation best-fitness trace.
#[derive(Debug, Clone)]
pub struct GeneticRun {
    pub result: OptimizeResult,
    /// Best score seen so far, one entry per generation. Non-decreasing.
    pub fitness_history: Vec<f64>,
    pub generations: u32,
}

/// Runs the genetic search over pre-expanded units and stock instances.
pub(crate) fn run(units: &[PartUnit], queue: &[StockSheet], settings: &CutSettings) -> GeneticRun {
    let n = units.len();
    let mut rng = StdRng::seed_from_u64(settings.random_seed);

    // One more unplaced part always outweighs any packing-density gain.
    let alpha = queue.iter().map(|s| s.area()).fold(0.0, f64::max);
    let beta = alpha * 0.01;

    let pop_size = settings.population_size.max(2);
    let elite_count = settings.elite_count.min(pop_size);

    let evaluate = |chromosome: &mut Chromosome| {
        let outcome = decode(chromosome, units, queue, settings);
        chromosome.fitness = score(&outcome, alpha, beta);
        outcome
    };

    // Seed individual: the guillotine's own order, no forced rotations.
    let mut seed = Chromosome {
        order: packing_order(units),
        rotations: vec![false; n],
        fitness: Fitness::WORST,
    };
    evaluate(&mut seed);

    let mut population = Vec::with_capacity(pop_size);
    population.push(seed);
    while population.len() < pop_size {
        let mut chromosome = Chromosome::random(n, &mut rng);
        evaluate(&mut chromosome);
        population.push(chromosome);
    }
    sort_by_fitness(&mut population);

    let mut best = population[0].clone();
    let mut history = Vec::with_capacity(settings.generations as usize);

    for generation in 0..settings.generations {
        let mut next: Vec<Chromosome> = population.iter().take(elite_count).cloned().collect();

        while next.len() < pop_size {
            let parent1 = tournament(&population, &mut rng);
            let parent2 = tournament(&population, &mut rng);

            let mut child = if rng.gen::<f64>() < settings.crossover_rate {
                parent1.crossover(parent2, &mut rng)
            } else {
                parent1.clone()
            };
            child.mutate(settings.mutation_rate, &mut rng);
            evaluate(&mut child);
            next.push(child);
        }

        sort_by_fitness(&mut next);
        if next[0].fitness.better_than(&best.fitness) {
            best = next[0].clone();
        }
        history.push(best.fitness.score);

        log::debug!(
            "generation {}: best score {:.1}, height {:.1}",
            generation,
            best.fitness.score,
            best.fitness.used_height
        );

        population = next;
    }

    let outcome = decode(&best, units, queue, settings);
    GeneticRun {
        result: outcome.result,
        fitness_history: history,
        generations: settings.generations,
    }
}

/// Decodes a chromosome by running the multi-sheet guillotine loop with the
/// chromosome's order and forced orientations.
fn decode(
    chromosome: &Chromosome,
    units: &[PartUnit],
    queue: &[StockSheet],
    settings: &CutSettings,
) -> PackOutcome {
    let view: Vec<&PartUnit> = chromosome.order.iter().map(|&i| &units[i]).collect();
    let mask: Vec<bool> = chromosome.order.iter().map(|&i| chromosome.rotations[i]).collect();
    pack_all(&view, queue, settings, Some(&mask))
}

fn score(outcome: &PackOutcome, alpha: f64, beta: f64) -> Fitness {
    let result = &outcome.result;
    Fitness {
        score: result.placed_area()
            - alpha * result.unplaced_count() as f64
            - beta * result.sheets_used() as f64,
        used_height: outcome.total_used_height,
    }
}

fn sort_by_fitness(population: &mut [Chromosome]) {
    population.sort_by(|a, b| {
        if a.fitness.better_than(&b.fitness) {
            std::cmp::Ordering::Less
        } else if b.fitness.better_than(&a.fitness) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
}

/// Tournament selection of size 3.
fn tournament<'a, R: Rng>(population: &'a [Chromosome], rng: &mut R) -> &'a Chromosome {
    let mut best_idx = rng.gen_range(0..population.len());
    for _ in 1..3 {
        let idx = rng.gen_range(0..population.len());
        if population[idx].fitness.better_than(&population[best_idx].fitness) {
            best_idx = idx;
        }
    }
    &population[best_idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use slabcut_model::Part;

    fn units_of(parts: &[Part]) -> Vec<PartUnit> {
        crate::optimizer::expand_parts(parts)
    }

    #[test]
    fn test_crossover_yields_valid_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let parent1 = Chromosome::random(10, &mut rng);
        let parent2 = Chromosome::random(10, &mut rng);

        let child = parent1.crossover(&parent2, &mut rng);
        let mut sorted = child.order.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
        assert_eq!(child.rotations.len(), 10);
    }

    #[test]
    fn test_mutation_preserves_permutation() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut chromosome = Chromosome::random(10, &mut rng);
        chromosome.mutate(0.5, &mut rng);

        let mut sorted = chromosome.order.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_run_is_deterministic_for_a_seed() {
        let parts = vec![
            Part::new("A", 400.0, 300.0, 3),
            Part::new("B", 250.0, 200.0, 4),
        ];
        let units = units_of(&parts);
        let queue = vec![StockSheet::new("S", 1200.0, 800.0, 2)];
        let mut settings = CutSettings::default();
        settings.population_size = 12;
        settings.generations = 15;

        let first = run(&units, &queue, &settings);
        let second = run(&units, &queue, &settings);
        assert_eq!(first.result, second.result);
        assert_eq!(first.fitness_history, second.fitness_history);
    }

    #[test]
    fn test_best_fitness_never_regresses() {
        let parts = vec![
            Part::new("A", 300.0, 200.0, 4),
            Part::new("B", 150.0, 150.0, 5),
        ];
        let units = units_of(&parts);
        let queue = vec![StockSheet::new("S", 900.0, 600.0, 2)];
        let mut settings = CutSettings::default();
        settings.population_size = 10;
        settings.generations = 20;

        let outcome = run(&units, &queue, &settings);
        for pair in outcome.fitness_history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_empty_parts() {
        let queue = vec![StockSheet::new("S", 1000.0, 500.0, 1)];
        let outcome = run(&[], &queue, &CutSettings::default());
        assert!(outcome.result.sheets.is_empty());
        assert!(outcome.result.unplaced.is_empty());
    }
}
