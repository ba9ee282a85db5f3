// src/civilization/roads.rs
use std::collections::HashSet;

use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};

use crate::civilization::Settlement;
use crate::grid::{GridPos, GridShape};

/// Дорога — оверлей поверх сетки, клетки под ней не меняются.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    /// Индекс поселения-начала
    pub from: usize,
    /// Индекс поселения-конца
    pub to: usize,
    pub path: Vec<GridPos>,
}

/// Соединяет каждое поселение с двумя ближайшими соседями.
pub fn connect_settlements(shape: GridShape, settlements: &[Settlement]) -> Vec<Road> {
    let mut roads = Vec::new();
    if settlements.len() < 2 {
        return roads;
    }

    for (i, a) in settlements.iter().enumerate() {
        let mut nearest: Vec<(i64, usize)> = settlements
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, b)| (shape.wrapped_dist2(a.position, b.position), j))
            .collect();
        nearest.sort_unstable();

        for &(_, j) in nearest.iter().take(2) {
            roads.push(Road {
                from: i,
                to: j,
                path: bresenham_wrap(shape, a.position, settlements[j].position),
            });
        }
    }
    roads
}

/// Отрезок Брезенхема по кратчайшему пути с учётом шва по X.
pub fn bresenham_wrap(shape: GridShape, from: GridPos, to: GridPos) -> Vec<GridPos> {
    let w = shape.width as i32;
    let h = shape.height as i32;
    let (x0, y0) = (from.x, from.y);
    let (mut x1, y1) = (to.x, to.y);

    // Если напрямую дальше половины ширины, идём через шов
    let raw_dx = x1 - x0;
    if raw_dx.abs() > w / 2 {
        x1 += if raw_dx > 0 { -w } else { w };
    }

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    let mut points = Vec::new();
    loop {
        points.push(GridPos::new(x.rem_euclid(w), y.clamp(0, h - 1)));
        if (x == x1 && y == y1) || points.len() > shape.len() {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Граф дорожной сети: узлы — индексы поселений, рёбра без повторов, вес — квадрат расстояния.
pub fn road_network(shape: GridShape, settlements: &[Settlement], roads: &[Road]) -> UnGraph<usize, i64> {
    let mut graph = UnGraph::new_undirected();
    let nodes: Vec<_> = (0..settlements.len()).map(|i| graph.add_node(i)).collect();

    let mut edges = HashSet::new();
    for road in roads {
        if road.from >= nodes.len() || road.to >= nodes.len() {
            continue;
        }
        let (a, b) = if road.from < road.to {
            (road.from, road.to)
        } else {
            (road.to, road.from)
        };
        if edges.insert((a, b)) {
            let weight = shape.wrapped_dist2(settlements[a].position, settlements[b].position);
            graph.add_edge(nodes[a], nodes[b], weight);
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civilization::SettlementKind;

    fn town(x: i32, y: i32) -> Settlement {
        Settlement {
            position: GridPos::new(x, y),
            kind: SettlementKind::Town,
            faction_id: -1,
            name: String::new(),
        }
    }

    fn is_step(shape: GridShape, a: GridPos, b: GridPos) -> bool {
        shape.wrapped_dx(a.x, b.x) <= 1 && (a.y - b.y).abs() <= 1
    }

    #[test]
    fn line_includes_both_endpoints_and_is_contiguous() {
        let shape = GridShape::new(50, 30);
        let path = bresenham_wrap(shape, GridPos::new(3, 4), GridPos::new(17, 11));
        assert_eq!(path.first(), Some(&GridPos::new(3, 4)));
        assert_eq!(path.last(), Some(&GridPos::new(17, 11)));
        assert_eq!(path.len(), 15);
        assert!(path.windows(2).all(|w| is_step(shape, w[0], w[1])));
    }

    #[test]
    fn line_takes_the_short_way_across_the_seam() {
        let shape = GridShape::new(40, 10);
        let path = bresenham_wrap(shape, GridPos::new(1, 5), GridPos::new(38, 5));
        assert_eq!(path.len(), 4);
        assert_eq!(path, vec![
            GridPos::new(1, 5),
            GridPos::new(0, 5),
            GridPos::new(39, 5),
            GridPos::new(38, 5),
        ]);
    }

    #[test]
    fn each_settlement_links_to_two_nearest() {
        let shape = GridShape::new(100, 50);
        let settlements = vec![town(0, 0), town(5, 0), town(10, 0), town(60, 40)];
        let roads = connect_settlements(shape, &settlements);
        assert_eq!(roads.len(), 8);
        assert_eq!((roads[0].from, roads[0].to), (0, 1));
        assert_eq!((roads[1].from, roads[1].to), (0, 2));

        let graph = road_network(shape, &settlements, &roads);
        assert_eq!(graph.node_count(), 4);
        // 0-1, 0-2, 1-2, 0-3, 1-3 (пары без повторов)
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn lonely_settlement_gets_no_roads() {
        let shape = GridShape::new(10, 10);
        assert!(connect_settlements(shape, &[town(1, 1)]).is_empty());
        assert!(connect_settlements(shape, &[]).is_empty());
    }
}
