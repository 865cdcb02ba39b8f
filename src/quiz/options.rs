use rand::seq::SliceRandom;
use rand::Rng;

pub const OPTION_COUNT: usize = 4;
const MAX_DISTRACTORS: usize = OPTION_COUNT - 1;

/// Answers compare trimmed and case-insensitively.
pub fn same_answer(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Four shuffled options: `correct` plus up to three distractors from `pool`,
/// padded with `"<correct> (alternative)"` when the pool runs short.
pub fn make_options(correct: &str, pool: &[&str]) -> [String; OPTION_COUNT] {
    make_options_with(correct, pool, &mut rand::thread_rng())
}

pub fn make_options_with<R: Rng + ?Sized>(
    correct: &str,
    pool: &[&str],
    rng: &mut R,
) -> [String; OPTION_COUNT] {
    let mut distractors = pool
        .iter()
        .filter(|d| !d.trim().is_empty() && !same_answer(d, correct))
        .take(MAX_DISTRACTORS);
    let padding = format!("{} (alternative)", correct);

    let mut options: [String; OPTION_COUNT] = std::array::from_fn(|i| {
        if i == 0 {
            correct.to_string()
        } else {
            distractors
                .next()
                .map(|d| d.to_string())
                .unwrap_or_else(|| padding.clone())
        }
    });
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(options: &[String; OPTION_COUNT]) -> Vec<String> {
        let mut v = options.to_vec();
        v.sort();
        v
    }

    #[test]
    fn empty_pool_pads() {
        let options = make_options("Paris", &[]);
        assert_eq!(
            sorted(&options),
            vec!["Paris", "Paris (alternative)", "Paris (alternative)", "Paris (alternative)"]
        );
    }

    #[test]
    fn takes_three_distractors_in_pool_order() {
        let options = make_options("Introduction", &["Overview", "Timeline", "References", "Appendix"]);
        assert_eq!(
            sorted(&options),
            vec!["Introduction", "Overview", "References", "Timeline"]
        );
    }

    #[test]
    fn correct_answer_removed_from_pool() {
        let options = make_options(" references ", &["Overview", "References", "", "Appendix"]);
        let lowered: Vec<String> = options.iter().map(|o| o.trim().to_lowercase()).collect();
        assert_eq!(lowered.iter().filter(|o| *o == "references").count(), 1);
        assert!(options.contains(&"Overview".to_string()));
        assert!(options.contains(&"Appendix".to_string()));
        assert!(options.contains(&" references  (alternative)".to_string()));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = ["NASA", "UNESCO", "World Bank", "CERN"];
        for _ in 0..50 {
            let options = make_options_with("Wikipedia", &pool, &mut rng);
            assert_eq!(sorted(&options), vec!["NASA", "UNESCO", "Wikipedia", "World Bank"]);
        }
    }

    #[test]
    fn correct_answer_lands_in_every_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; OPTION_COUNT];
        for _ in 0..200 {
            let options = make_options_with("Paris", &["Rome", "Berlin", "Madrid"], &mut rng);
            let pos = options.iter().position(|o| o == "Paris").unwrap();
            seen[pos] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn same_answer_ignores_case_and_padding() {
        assert!(same_answer("  Bletchley Park", "bletchley park "));
        assert!(!same_answer("Bletchley", "Bletchley Park"));
    }
}
