use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::types::ToSql;
use serde::Serialize;

use super::Database;
use crate::models::Category;

/// Optional slicing for every aggregate query. Both filters are AND-combined
/// when present.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsFilter {
    pub speaker_id: Option<i64>,
    pub meeting_transcript_id: Option<i64>,
}

impl MetricsFilter {
    pub fn new(speaker_id: Option<i64>, meeting_transcript_id: Option<i64>) -> Self {
        Self {
            speaker_id,
            meeting_transcript_id,
        }
    }
}

/// One pie-chart row: label, raw count, and percentage of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: i64,
    pub percentage: f64,
}

fn push_filter_clauses(
    sql: &mut String,
    params: &mut Vec<Box<dyn ToSql>>,
    filter: &MetricsFilter,
) {
    if let Some(speaker_id) = filter.speaker_id {
        params.push(Box::new(speaker_id));
        sql.push_str(&format!(" AND tm.speaker_id = ?{}", params.len()));
    }
    if let Some(transcript_id) = filter.meeting_transcript_id {
        params.push(Box::new(transcript_id));
        sql.push_str(&format!(" AND tm.meeting_transcript_id = ?{}", params.len()));
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl Database {
    /// Mean of non-null scores per sub-category for one category.
    ///
    /// A NULL sub-category is reported under the "overall" key. Empty result
    /// sets yield an empty mapping.
    pub fn average_scores(
        &self,
        category: Category,
        filter: &MetricsFilter,
    ) -> Result<BTreeMap<String, f64>> {
        self.with_connection(|conn| {
            let mut sql = String::from(
                "SELECT tmt.sub_category, AVG(tmt.score)
                 FROM transcript_message_tags tmt
                 INNER JOIN transcript_messages tm ON tmt.transcript_message_id = tm.id
                 WHERE tmt.category = ?1",
            );
            let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(category.as_str())];
            push_filter_clauses(&mut sql, &mut params, filter);
            sql.push_str(" AND tmt.score IS NOT NULL GROUP BY tmt.sub_category");

            let mut stmt = conn
                .prepare(&sql)
                .context("Failed to prepare average scores query")?;
            let rows = stmt
                .query_map(
                    rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                    |row| {
                        let sub_category: Option<String> = row.get(0)?;
                        let avg: f64 = row.get(1)?;
                        Ok((sub_category, avg))
                    },
                )
                .context("Failed to query average scores")?;

            let mut averages = BTreeMap::new();
            for row in rows {
                let (sub_category, avg) = row.context("Failed to read average score row")?;
                averages.insert(
                    sub_category.unwrap_or_else(|| "overall".to_string()),
                    round_to(avg, 2),
                );
            }
            Ok(averages)
        })
    }

    /// Label frequency counts for a category, optionally narrowed to one
    /// sub-category.
    pub fn label_counts(
        &self,
        category: Category,
        sub_category: Option<&str>,
        filter: &MetricsFilter,
    ) -> Result<BTreeMap<String, i64>> {
        self.with_connection(|conn| {
            let mut sql = String::from(
                "SELECT tmt.label, COUNT(*)
                 FROM transcript_message_tags tmt
                 INNER JOIN transcript_messages tm ON tmt.transcript_message_id = tm.id
                 WHERE tmt.category = ?1 AND tmt.label IS NOT NULL",
            );
            let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(category.as_str())];
            if let Some(sub_category) = sub_category {
                params.push(Box::new(sub_category.to_string()));
                sql.push_str(&format!(" AND tmt.sub_category = ?{}", params.len()));
            }
            push_filter_clauses(&mut sql, &mut params, filter);
            sql.push_str(" GROUP BY tmt.label");

            let mut stmt = conn
                .prepare(&sql)
                .context("Failed to prepare label counts query")?;
            let rows = stmt
                .query_map(
                    rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
                )
                .context("Failed to query label counts")?;

            let mut counts = BTreeMap::new();
            for row in rows {
                let (label, count) = row.context("Failed to read label count row")?;
                counts.insert(label, count);
            }
            Ok(counts)
        })
    }

    /// Label counts turned into pie-chart rows with percentages to one
    /// decimal. A zero total yields an empty sequence rather than dividing.
    pub fn pie_chart_data(
        &self,
        category: Category,
        sub_category: Option<&str>,
        filter: &MetricsFilter,
    ) -> Result<Vec<PieSlice>> {
        let counts = self.label_counts(category, sub_category, filter)?;
        let total: i64 = counts.values().sum();
        if total == 0 {
            return Ok(vec![]);
        }

        Ok(counts
            .into_iter()
            .map(|(label, count)| PieSlice {
                label,
                count,
                percentage: round_to(count as f64 / total as f64 * 100.0, 1),
            })
            .collect())
    }

    /// Adhered/did_not_adhere counts for one named skill.
    pub fn subcategory_adherence_counts(
        &self,
        category: Category,
        sub_category: &str,
        filter: &MetricsFilter,
    ) -> Result<BTreeMap<String, i64>> {
        self.label_counts(category, Some(sub_category), filter)
    }
}
