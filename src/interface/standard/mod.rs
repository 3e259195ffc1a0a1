//! # Standard Interface Module
//!
//! Machine-legible JSON rendering of solver results, built manually over
//! [`serde_json::Map`]/[`serde_json::Value`] rather than through a derived
//! `Serialize` impl, for scripted or automated callers of the CLI.

use serde_json::{Map, Value as Json};

use crate::model::{Tier, TierPosition, TierStatus, Value};
use crate::solver::manager::MoveReport;
use crate::solver::tier_worker::TierSolveSummary;

fn value_to_json(value: Option<Value>) -> Json {
    let mut map = Map::new();
    match value {
        Some(Value::Win(r)) => {
            map.insert("outcome".into(), Json::String("win".into()));
            map.insert("remoteness".into(), Json::from(r));
        },
        Some(Value::Lose(r)) => {
            map.insert("outcome".into(), Json::String("lose".into()));
            map.insert("remoteness".into(), Json::from(r));
        },
        Some(Value::Tie(r)) => {
            map.insert("outcome".into(), Json::String("tie".into()));
            map.insert("remoteness".into(), Json::from(r));
        },
        Some(Value::Draw) => {
            map.insert("outcome".into(), Json::String("draw".into()));
            map.insert("remoteness".into(), Json::Null);
        },
        None => {
            map.insert("outcome".into(), Json::String("undecided".into()));
            map.insert("remoteness".into(), Json::Null);
        },
    }
    Json::Object(map)
}

fn status_to_str(status: TierStatus) -> &'static str {
    match status {
        TierStatus::Solved => "solved",
        TierStatus::Corrupted => "corrupted",
        TierStatus::Missing => "missing",
        TierStatus::CheckError => "check-error",
    }
}

pub fn position_info_to_json(position: TierPosition, value: Option<Value>) -> String {
    let mut map = Map::new();
    map.insert("tier".into(), Json::from(position.tier));
    map.insert("position".into(), Json::from(position.position));
    map.insert("value".into(), value_to_json(value));
    Json::Object(map).to_string()
}

pub fn tier_status_to_json(tier: Tier, status: TierStatus) -> String {
    let mut map = Map::new();
    map.insert("tier".into(), Json::from(tier));
    map.insert("status".into(), Json::String(status_to_str(status).into()));
    Json::Object(map).to_string()
}

pub fn moves_to_json(moves: &[MoveReport]) -> String {
    let mut reports = Vec::with_capacity(moves.len());
    for report in moves {
        let mut map = Map::new();
        map.insert("move".into(), Json::from(report.mv));
        map.insert("tier".into(), Json::from(report.child.tier));
        map.insert("position".into(), Json::from(report.child.position));
        map.insert("value".into(), value_to_json(report.value));
        map.insert("optimal".into(), Json::Bool(report.optimal));
        reports.push(Json::Object(map));
    }
    Json::Array(reports).to_string()
}

pub fn solve_summary_to_json(summaries: &[(Tier, TierSolveSummary)]) -> String {
    let mut tiers = Vec::with_capacity(summaries.len());
    for (tier, summary) in summaries {
        let mut map = Map::new();
        map.insert("tier".into(), Json::from(*tier));
        map.insert("win".into(), Json::from(summary.win));
        map.insert("lose".into(), Json::from(summary.lose));
        map.insert("tie".into(), Json::from(summary.tie));
        map.insert("draw".into(), Json::from(summary.draw));
        map.insert("total".into(), Json::from(summary.total()));
        tiers.push(Json::Object(map));
    }
    Json::Array(tiers).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_info_round_trips_through_serde_json() {
        let rendered = position_info_to_json(TierPosition::new(3, 7), Some(Value::Win(2)));
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["tier"], 3);
        assert_eq!(parsed["position"], 7);
        assert_eq!(parsed["value"]["outcome"], "win");
        assert_eq!(parsed["value"]["remoteness"], 2);
    }

    #[test]
    fn undecided_position_has_null_remoteness() {
        let rendered = position_info_to_json(TierPosition::new(0, 0), None);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["value"]["outcome"], "undecided");
        assert!(parsed["value"]["remoteness"].is_null());
    }

    #[test]
    fn moves_round_trip_with_optimal_flag() {
        let moves = vec![MoveReport {
            mv: 2,
            child: TierPosition::new(1, 5),
            value: Some(Value::Lose(1)),
            optimal: true,
        }];
        let rendered = moves_to_json(&moves);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["move"], 2);
        assert_eq!(parsed[0]["tier"], 1);
        assert_eq!(parsed[0]["position"], 5);
        assert_eq!(parsed[0]["value"]["outcome"], "lose");
        assert_eq!(parsed[0]["optimal"], true);
    }
}
