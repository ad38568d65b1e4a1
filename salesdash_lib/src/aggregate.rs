//! Grouped aggregation over ledger rows.
//!
//! Groups come back in first-seen key order and sums accumulate left to right
//! in row order, so identical input always produces identical floating-point
//! results. No rounding happens here.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::row::SaleRow;

/// Field whose distinct values a bucket counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctField {
    Customer,
    Product,
}

/// Optional reductions on top of the sums and row count every bucket carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reducers {
    pub distinct: Option<DistinctField>,
    pub mean_price: bool,
}

impl Reducers {
    pub fn sums() -> Self {
        Self::default()
    }

    pub fn distinct(field: DistinctField) -> Self {
        Self {
            distinct: Some(field),
            mean_price: false,
        }
    }

    pub fn with_mean_price(mut self) -> Self {
        self.mean_price = true;
        self
    }
}

/// Reduced values for one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    pub total_sales_value: f64,
    pub total_mass: f64,
    pub count: usize,
    pub distinct_count: Option<usize>,
    pub mean_price_per_kg: Option<f64>,
}

impl Bucket {
    /// Sales value per kilogram of the whole bucket, 0 without mass.
    pub fn price_per_kg(&self) -> f64 {
        crate::row::derive_price_per_kg(self.total_sales_value, self.total_mass)
    }
}

#[derive(Default)]
struct Accumulator {
    sales: f64,
    mass: f64,
    count: usize,
    price_sum: f64,
    distinct: HashSet<String>,
}

impl Accumulator {
    fn add(&mut self, row: &SaleRow, reducers: &Reducers) {
        self.sales += row.sales_value;
        self.mass += row.mass;
        self.count += 1;
        if reducers.mean_price {
            self.price_sum += row.price_per_kg;
        }
        match reducers.distinct {
            Some(DistinctField::Customer) => {
                self.distinct.insert(row.customer.clone());
            }
            Some(DistinctField::Product) => {
                self.distinct.insert(row.product.clone());
            }
            None => {}
        }
    }

    fn finish(self, reducers: &Reducers) -> Bucket {
        Bucket {
            total_sales_value: self.sales,
            total_mass: self.mass,
            count: self.count,
            distinct_count: reducers.distinct.map(|_| self.distinct.len()),
            mean_price_per_kg: if reducers.mean_price && self.count > 0 {
                Some(self.price_sum / self.count as f64)
            } else {
                None
            },
        }
    }
}

/// Group `rows` by `key_fn` and reduce each group into a [`Bucket`].
///
/// Returns `(key, bucket)` pairs in the order each key was first seen.
pub fn aggregate<'a, K, I, F>(rows: I, key_fn: F, reducers: &Reducers) -> Vec<(K, Bucket)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a SaleRow>,
    F: Fn(&SaleRow) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Accumulator)> = Vec::new();

    for row in rows {
        let key = key_fn(row);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push((key.clone(), Accumulator::default()));
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].1.add(row, reducers);
    }

    groups
        .into_iter()
        .map(|(key, acc)| (key, acc.finish(reducers)))
        .collect()
}

/// Reduce all `rows` into a single bucket.
pub fn total<'a, I>(rows: I, reducers: &Reducers) -> Bucket
where
    I: IntoIterator<Item = &'a SaleRow>,
{
    let mut acc = Accumulator::default();
    for row in rows {
        acc.add(row, reducers);
    }
    acc.finish(reducers)
}

/// Look up a key in an aggregation result, yielding an empty bucket when the
/// key never occurred.
pub fn bucket_for<K: PartialEq>(groups: &[(K, Bucket)], key: &K) -> Bucket {
    groups
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, b)| b.clone())
        .unwrap_or_default()
}

/// Stable descending sort by `metric`; equal values keep their input order.
pub fn rank_desc<T, F>(items: &mut [T], metric: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| {
        metric(b)
            .partial_cmp(&metric(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
