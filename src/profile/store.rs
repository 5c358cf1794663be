//! Profile lookups: interval sample pooling, point estimates, and
//! interval probabilities.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::config::ProfileConfig;
use super::document::{ProfileDocument, QualityTree};
use crate::error::{ContractError, Result};

/// Times this close to the time limit are treated as being at the limit.
const LIMIT_TOLERANCE: f64 = 1e-9;

/// Rounds `value` to the nearest multiple of `step`, ties to even.
///
/// # Examples
///
/// ```
/// use u_contract::profile::round_nearest;
///
/// assert!((round_nearest(0.07, 0.05) - 0.05).abs() < 1e-12);
/// assert!((round_nearest(0.08, 0.05) - 0.10).abs() < 1e-12);
/// ```
pub fn round_nearest(value: f64, step: f64) -> f64 {
    (value / step).round_ties_even() * step
}

/// Arithmetic mean of a sample set.
pub fn average_quality(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(ContractError::EmptySampleSet);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Immutable store of empirical performance profiles.
///
/// Safe to share across threads; no query mutates it.
#[derive(Debug, Clone)]
pub struct PerformanceProfile {
    mappings: HashMap<usize, BTreeMap<String, QualityTree>>,
    config: ProfileConfig,
    time_decimals: usize,
}

impl PerformanceProfile {
    /// Builds the store from an already parsed document.
    pub fn from_document(document: ProfileDocument, config: ProfileConfig) -> Result<Self> {
        config.validate().map_err(ContractError::InvalidConfig)?;

        let mut mappings = HashMap::with_capacity(document.len());
        for (key, node) in document {
            let id = key
                .strip_prefix("node_")
                .and_then(|raw| raw.parse::<usize>().ok())
                .ok_or_else(|| {
                    ContractError::MalformedProfile(format!("unexpected node key {key:?}"))
                })?;
            mappings.insert(id, node.qualities);
        }

        let time_decimals = decimal_places(config.time_step_size).max(1);
        tracing::debug!(nodes = mappings.len(), time_decimals, "performance profile loaded");

        Ok(Self {
            mappings,
            config,
            time_decimals,
        })
    }

    /// Parses a JSON profile document.
    pub fn from_json_str(json: &str, config: ProfileConfig) -> Result<Self> {
        let document: ProfileDocument = serde_json::from_str(json)?;
        Self::from_document(document, config)
    }

    /// Reads a JSON profile document from any reader.
    pub fn from_reader<R: Read>(reader: R, config: ProfileConfig) -> Result<Self> {
        let document: ProfileDocument = serde_json::from_reader(reader)?;
        Self::from_document(document, config)
    }

    /// Reads a JSON profile document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P, config: ProfileConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Whether the profile has an entry for the node.
    pub fn contains_node(&self, node_id: usize) -> bool {
        self.mappings.contains_key(&node_id)
    }

    /// Pools every sample recorded in the time band containing `time`.
    ///
    /// The band is `[floor(time), floor(time) + time_interval)` on the
    /// `time_interval` grid, except at the time limit where it is the last
    /// full band ending at the limit. Parent qualities are each rounded to
    /// the nearest `quality_interval` and descend one nesting level apiece.
    pub fn quality_samples_on_interval(
        &self,
        time: f64,
        node_id: usize,
        parent_qualities: &[f64],
    ) -> Result<Vec<f64>> {
        let interval = self.config.time_interval;
        let step = self.config.time_step_size;
        let start = if (time - self.config.time_limit).abs() <= LIMIT_TOLERANCE {
            ((time - interval) / interval).floor() * interval
        } else {
            (time / interval).floor() * interval
        };

        let (mapping, path) = self.descend(node_id, time, parent_qualities)?;
        let count = (interval / step - LIMIT_TOLERANCE).ceil() as usize;

        let mut qualities = Vec::new();
        for k in 0..count {
            let t = round_to(start + k as f64 * step, self.time_decimals);
            let key = self.time_key(t);
            qualities.extend_from_slice(samples_at(mapping, node_id, time, &path, key)?);
        }
        Ok(qualities)
    }

    /// Mean quality at the single time key nearest to `time`.
    ///
    /// Unlike [`quality_samples_on_interval`](Self::quality_samples_on_interval)
    /// this rounds `time` to the nearest `time_interval` and reads exactly
    /// one key.
    pub fn average_quality_estimate(
        &self,
        node_id: usize,
        time: f64,
        parent_qualities: &[f64],
    ) -> Result<f64> {
        let (mapping, path) = self.descend(node_id, time, parent_qualities)?;
        let estimated = round_nearest(time, self.config.time_interval);
        let key = self.time_key(estimated);
        average_quality(samples_at(mapping, node_id, time, &path, key)?)
    }

    /// Fraction of `samples` in the quality band containing
    /// `queried_quality`: `[floor(q), floor(q) + quality_interval)`.
    pub fn interval_probability(&self, queried_quality: f64, samples: &[f64]) -> Result<f64> {
        if samples.is_empty() {
            return Err(ContractError::EmptySampleSet);
        }
        let interval = self.config.quality_interval;
        let start = (queried_quality / interval).floor() * interval;
        let end = start + interval;
        let hits = samples.iter().filter(|&&q| start <= q && q < end).count();
        Ok(hits as f64 / samples.len() as f64)
    }

    /// Walks the parent-quality levels of a node's mapping.
    fn descend(
        &self,
        node_id: usize,
        time: f64,
        parent_qualities: &[f64],
    ) -> Result<(&BTreeMap<String, QualityTree>, Vec<String>)> {
        let mut path = vec![format!("node_{node_id}")];
        let mut mapping =
            self.mappings
                .get(&node_id)
                .ok_or_else(|| ContractError::MissingProfileEntry {
                    node_id,
                    time,
                    path: path.clone(),
                })?;

        for &quality in parent_qualities {
            let key = quality_key(round_nearest(quality, self.config.quality_interval));
            let next = mapping.get(&key);
            path.push(key);
            match next {
                Some(QualityTree::Branch(inner)) => mapping = inner,
                Some(QualityTree::Samples(_)) => {
                    return Err(ContractError::MalformedProfile(format!(
                        "node {node_id}: expected a parent-quality level at {}",
                        path.join(" -> ")
                    )));
                }
                None => {
                    return Err(ContractError::MissingProfileEntry {
                        node_id,
                        time,
                        path,
                    });
                }
            }
        }
        Ok((mapping, path))
    }

    /// Formats a time key the way the profile document records it: at
    /// least one decimal, no trailing zeros beyond that.
    fn time_key(&self, time: f64) -> String {
        let mut key = format!("{:.*}", self.time_decimals, time);
        while key.ends_with('0') && key.len() - key.find('.').unwrap_or(key.len()) > 2 {
            key.pop();
        }
        key
    }
}

fn samples_at<'a>(
    mapping: &'a BTreeMap<String, QualityTree>,
    node_id: usize,
    time: f64,
    path: &[String],
    key: String,
) -> Result<&'a [f64]> {
    match mapping.get(&key) {
        Some(QualityTree::Samples(samples)) if samples.is_empty() => {
            Err(ContractError::NullMapping { node_id, key })
        }
        Some(QualityTree::Samples(samples)) => Ok(samples),
        Some(QualityTree::Branch(_)) => Err(ContractError::MalformedProfile(format!(
            "node {node_id}: expected samples at time key {key}, found a nested mapping"
        ))),
        None => {
            let mut path = path.to_vec();
            path.push(key);
            Err(ContractError::MissingProfileEntry {
                node_id,
                time,
                path,
            })
        }
    }
}

fn quality_key(quality: f64) -> String {
    format!("{quality:.2}")
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Digits after the decimal point in the shortest representation.
fn decimal_places(value: f64) -> usize {
    let repr = value.to_string();
    repr.find('.').map_or(0, |dot| repr.len() - dot - 1)
}
