use crate::Kbn;

/// Returns the population mean of a list of counts
///
/// # Arguments
///
/// * `counts` - The counts to aggregate
///
/// # Returns
///
/// * `Option<f64>` - The mean, or `None` if the list is empty
pub fn mean_of_counts(counts: &[usize]) -> Option<f64> {
    if counts.is_empty() {
        return None;
    }
    let mut sum: Kbn<f64> = Kbn::default();
    for &count in counts {
        sum += count as f64;
    }
    Some(sum.total() / counts.len() as f64)
}

/// Returns the median of an ascending list of counts
///
/// # Arguments
///
/// * `counts` - The counts to aggregate, sorted ascending
///
/// # Returns
///
/// * `Option<f64>` - The median, or `None` if the list is empty
pub fn median_of_sorted_counts(counts: &[usize]) -> Option<f64> {
    let len = counts.len();
    let mid = len / 2;
    match len {
        0 => None,
        _ if len % 2 == 0 => Some((counts[mid - 1] + counts[mid]) as f64 / 2.0),
        _ => Some(counts[mid] as f64),
    }
}

/// Returns the population standard deviation of a list of counts
///
/// # Arguments
///
/// * `counts` - The counts to aggregate
///
/// # Returns
///
/// * `Option<f64>` - The standard deviation, or `None` if the list is
///   empty
pub fn stddev_of_counts(counts: &[usize]) -> Option<f64> {
    let mean = mean_of_counts(counts)?;
    let mut sum_sq: Kbn<f64> = Kbn::default();
    for &count in counts {
        let diff = count as f64 - mean;
        sum_sq += diff * diff;
    }
    Some((sum_sq.total() / counts.len() as f64).sqrt())
}
