// Helpers for declaring state sets

use hashbrown::HashSet;

use crate::state::State;

/// Integer states `a..=b`.
pub fn between(a: i64, b: i64) -> Vec<State> {
    (a..=b).map(State::Int).collect()
}

/// Cartesian product of the factors, as tuple states.
///
/// The product of zero factors is the single empty tuple.
pub fn product(factors: &[Vec<State>]) -> Vec<State> {
    let mut rows: Vec<Vec<State>> = vec![Vec::new()];
    for factor in factors {
        let mut next = Vec::with_capacity(rows.len() * factor.len());
        for row in &rows {
            for item in factor {
                let mut extended = row.clone();
                extended.push(item.clone());
                next.push(extended);
            }
        }
        rows = next;
    }
    rows.into_iter().map(State::Tuple).collect()
}

/// Union of all given state collections, without duplicates.
pub fn union<I>(parts: I) -> HashSet<State>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = State>,
{
    parts.into_iter().flatten().collect()
}

/// States present in every one of the given collections.
pub fn intersection(first: &[State], rest: &[Vec<State>]) -> HashSet<State> {
    first
        .iter()
        .filter(|state| rest.iter().all(|part| part.contains(state)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_is_inclusive() {
        let states = between(0, 9);
        assert_eq!(states.len(), 10);
        assert_eq!(states[0], State::Int(0));
        assert_eq!(states[9], State::Int(9));
        assert!(between(3, 2).is_empty());
    }

    #[test]
    fn product_sizes() {
        assert_eq!(product(&[between(0, 9), between(0, 9)]).len(), 100);
        assert_eq!(
            product(&[between(0, 9), between(0, 9), between(0, 9)]).len(),
            1000
        );
    }

    #[test]
    fn product_builds_tuples_in_order() {
        let states = product(&[between(0, 1), vec![State::from("x")]]);
        assert_eq!(states, vec![State::from((0, "x")), State::from((1, "x"))]);
    }

    #[test]
    fn union_and_intersection() {
        let all = union([between(0, 3), between(2, 5)]);
        assert_eq!(all.len(), 6);

        let common = intersection(&between(0, 5), &[between(2, 8), between(4, 9)]);
        assert_eq!(common.len(), 2);
        assert!(common.contains(&State::Int(4)));
        assert!(common.contains(&State::Int(5)));
    }
}
