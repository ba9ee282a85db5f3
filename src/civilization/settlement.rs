// src/civilization/settlement.rs
use serde::{Deserialize, Serialize};

use crate::grid::{GridPos, GridShape};
use crate::noise::hash2;

/// Поселения не ставятся выше этого превышения над уровнем океана.
const SETTLEMENT_MAX_HEIGHT: f32 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    Town,
    City,
    Capital,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub position: GridPos,
    pub kind: SettlementKind,
    /// Фракция, на чьей территории стоит поселение (-1 — ничья)
    pub faction_id: i32,
    pub name: String,
}

/// Поля, по которым оценивается пригодность клетки.
#[derive(Debug, Clone, Copy)]
pub struct SiteFields<'a> {
    pub elevation: &'a [f32],
    pub ocean: &'a [bool],
    pub ocean_threshold: f32,
    pub moisture: &'a [f32],
    pub temperature: &'a [f32],
    pub coast_distance: &'a [u32],
    pub river: &'a [u8],
    pub faction_id: &'a [i32],
    pub faction_strength: &'a [f32],
}

impl SiteFields<'_> {
    /// Пригодность клетки под поселение; `None`, если клетка не годится вовсе.
    pub fn suitability(&self, idx: usize) -> Option<f32> {
        if self.ocean[idx] || self.elevation[idx] > self.ocean_threshold + SETTLEMENT_MAX_HEIGHT {
            return None;
        }
        let m = self.moisture[idx];
        let t = self.temperature[idx];
        let coast = (1.0 - self.coast_distance[idx] as f32 / 12.0).clamp(0.0, 1.0);
        let near_river = if self.river[idx] > 0 { 1.0 } else { 0.0 };

        let mut suit = (0.35 + 0.5 * m + 0.2 * t) * (0.7 + 0.3 * coast + 0.3 * near_river);
        // Центры фракций привлекательнее окраин
        if self.faction_id[idx] >= 0 {
            suit *= 1.0 + 0.25 * self.faction_strength[idx];
        }
        Some(suit)
    }
}

/// Жадно расставляет поселения по убыванию пригодности с минимальным расстоянием `spacing`.
pub fn place_settlements(
    shape: GridShape,
    seed: u32,
    fields: &SiteFields<'_>,
    target: usize,
    spacing: u32,
) -> Vec<Settlement> {
    let mut settlements: Vec<Settlement> = Vec::with_capacity(target);
    if target == 0 {
        return settlements;
    }

    let mut candidates: Vec<(f32, usize)> = (0..shape.len())
        .filter_map(|idx| fields.suitability(idx).map(|s| (s, idx)))
        .collect();
    // Сортировка устойчивая: при равной пригодности раньше идёт клетка с меньшим индексом
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    let min_dist2 = i64::from(spacing) * i64::from(spacing);
    for &(_, idx) in &candidates {
        if settlements.len() >= target {
            break;
        }
        let pos = shape.position(idx);
        let crowded = settlements
            .iter()
            .any(|s| shape.wrapped_dist2(pos, s.position) < min_dist2);
        if crowded {
            continue;
        }
        settlements.push(Settlement {
            position: pos,
            kind: SettlementKind::Town,
            faction_id: fields.faction_id[idx],
            name: String::new(),
        });
    }

    label_settlements(&mut settlements);
    for (i, s) in settlements.iter_mut().enumerate() {
        s.name = settlement_name(seed, i, s.kind);
    }
    settlements
}

/// Первое поселение — столица, следующие несколько — города.
pub fn label_settlements(settlements: &mut [Settlement]) {
    let notable = (settlements.len() / 10).clamp(3, 8).min(settlements.len());
    for (i, s) in settlements.iter_mut().take(notable).enumerate() {
        s.kind = if i == 0 {
            SettlementKind::Capital
        } else {
            SettlementKind::City
        };
    }
}

const SYLLABLES_HEAD: [&str; 25] = [
    "Al", "Bel", "Cor", "Dor", "Eld", "Fen", "Gal", "Har", "Ith", "Jar", "Kel", "Lor", "Mor", "Nor", "Or", "Pel",
    "Quel", "Rav", "Sor", "Tor", "Ul", "Val", "Wen", "Yor", "Zan",
];
const SYLLABLES_MID: [&str; 10] = ["a", "e", "i", "o", "u", "ae", "ia", "oa", "uu", "ei"];
const SYLLABLES_TAIL: [&str; 20] = [
    "ford", "haven", "gate", "watch", "dale", "shire", "crest", "port", "hold", "field", "wick", "marsh", "fall",
    "reach", "spire", "barrow", "cross", "mead", "brook", "cairn",
];

/// Детерминированное имя из трёх слогов; столица получает приставку «Prime».
pub fn settlement_name(seed: u32, index: usize, kind: SettlementKind) -> String {
    let s = seed.wrapping_add(91_000);
    let pick = |slot: i32, len: usize| hash2(s, index as i32, slot) as usize % len;
    let name = format!(
        "{}{}{}",
        SYLLABLES_HEAD[pick(0, SYLLABLES_HEAD.len())],
        SYLLABLES_MID[pick(1, SYLLABLES_MID.len())],
        SYLLABLES_TAIL[pick(2, SYLLABLES_TAIL.len())],
    );
    match kind {
        SettlementKind::Capital => format!("{name} Prime"),
        SettlementKind::City | SettlementKind::Town => name,
    }
}
