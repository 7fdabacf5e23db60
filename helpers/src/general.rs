use std::cmp::Ordering;

/// argsort returns the indices that would sort an array in ascending order. The sort is stable,
/// i.e. equal values keep their input order. Incomparable values (NaN) are treated as equal.
pub fn argsort<T: PartialOrd>(x: &[T]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    indices.sort_by(|&a, &b| x[a].partial_cmp(&x[b]).unwrap_or(Ordering::Equal));
    indices
}

/// argmin returns the index of the (first) minimum value in the array x, None if x is empty.
pub fn argmin<T: PartialOrd + Copy>(x: &[T]) -> Option<usize> {
    let mut iter = x.iter().enumerate();
    let (mut idx_min, &first) = iter.next()?;
    let mut val_min = first;

    for (i, &val) in iter {
        if val < val_min {
            val_min = val;
            idx_min = i;
        }
    }

    Some(idx_min)
}

/// min returns the minimum value in the array x, None if x is empty.
pub fn min<T: PartialOrd + Copy>(x: &[T]) -> Option<T> {
    argmin(x).map(|idx| x[idx])
}
