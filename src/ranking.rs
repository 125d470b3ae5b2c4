use crate::models::Movie;

/// Ranks a rating-ascending list from the bottom up: the first (worst or
/// unrated) movie ranks 1 and the last (best-rated) ranks `len`.
///
/// Returns `(id, ranking)` for the movies whose ranking changed.
pub fn assign_rankings(movies: &mut [Movie]) -> Vec<(i32, i32)> {
    let mut changed = Vec::new();

    for (i, movie) in movies.iter_mut().enumerate() {
        let ranking = i32::try_from(i + 1).unwrap_or(i32::MAX);
        if movie.ranking != Some(ranking) {
            movie.ranking = Some(ranking);
            changed.push((movie.id, ranking));
        }
    }

    changed
}
