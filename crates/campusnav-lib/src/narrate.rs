//! Turn a vertex path into per-floor polylines and walking instructions.
//!
//! Instructions come in two families: floor and building transitions first
//! (in path order), then one directional instruction per step inside each
//! floor group.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::graph::{EdgeKind, Graph, Vertex, VertexId, VertexKind};

const SAME_SPOT: f64 = 1e-9;

/// One rendered point of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePoint {
    pub x: f64,
    pub y: f64,
    pub vertex: String,
    pub floor: i32,
}

impl RoutePoint {
    fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Contiguous run of route points on one floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorGroup {
    pub floor: i32,
    pub points: Vec<RoutePoint>,
}

/// Output of [`narrate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Narration {
    pub floors: Vec<FloorGroup>,
    pub instructions: Vec<String>,
}

/// Direction of travel relative to the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Forward,
    Left,
    Right,
    Back,
}

impl Turn {
    fn phrase(self) -> &'static str {
        match self {
            Turn::Forward => "go forward",
            Turn::Left => "turn left",
            Turn::Right => "turn right",
            Turn::Back => "turn back",
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Turn::Forward => "forward",
            Turn::Left => "left",
            Turn::Right => "right",
            Turn::Back => "back",
        };
        f.write_str(value)
    }
}

/// Classify a signed turn angle in degrees.
///
/// `[-45, 45]` is forward, `(45, 135]` left, `[-135, -45)` right, and
/// everything else back.
pub fn classify_turn(angle: f64) -> Turn {
    if (-45.0..=45.0).contains(&angle) {
        Turn::Forward
    } else if angle > 45.0 && angle <= 135.0 {
        Turn::Left
    } else if (-135.0..-45.0).contains(&angle) {
        Turn::Right
    } else {
        Turn::Back
    }
}

/// Signed change of bearing at `current`, in degrees within `(-180, 180]`.
///
/// A zero-length leg has no bearing, so the turn is reported as `0`.
pub fn turn_angle(prev: Position, current: Position, next: Position) -> f64 {
    match (bearing(prev, current), bearing(current, next)) {
        (Some(incoming), Some(outgoing)) => normalize_turn(outgoing - incoming),
        _ => 0.0,
    }
}

fn normalize_turn(delta: f64) -> f64 {
    let turn = (delta + 180.0).rem_euclid(360.0) - 180.0;
    if turn <= -180.0 {
        turn + 360.0
    } else {
        turn
    }
}

fn bearing(from: Position, to: Position) -> Option<f64> {
    if from.distance_to(&to) <= SAME_SPOT {
        return None;
    }
    Some((to.y - from.y).atan2(to.x - from.x).to_degrees())
}

/// Narrate a path found on `graph`.
///
/// Fails with [`Error::MalformedVertex`] when any vertex on the path is
/// unknown to the graph or has non-finite coordinates.
pub fn narrate(graph: &Graph, path: &[VertexId]) -> Result<Narration> {
    let expanded = expand_outdoor_walks(graph, path);
    let vertices = expanded
        .iter()
        .map(|&id| lookup(graph, id))
        .collect::<Result<Vec<_>>>()?;

    let floors = group_by_floor(&vertices);
    let mut instructions = transition_instructions(graph, &expanded, &vertices);
    instructions.extend(directional_instructions(&floors));

    Ok(Narration {
        floors,
        instructions,
    })
}

/// Reinsert the real arrival point of an outdoor segment wherever the path
/// jumps straight between that segment's two transition phantoms.
pub fn expand_outdoor_walks(graph: &Graph, path: &[VertexId]) -> Vec<VertexId> {
    let mut expanded = Vec::with_capacity(path.len());
    for (index, &node) in path.iter().enumerate() {
        expanded.push(node);
        let Some(&next) = path.get(index + 1) else {
            continue;
        };
        let (Some(current), Some(following)) = (graph.vertex(node), graph.vertex(next)) else {
            continue;
        };
        if let (
            VertexKind::OutdoorEndpoint { outdoor, side },
            VertexKind::OutdoorEndpoint {
                outdoor: next_outdoor,
                side: next_side,
            },
        ) = (&current.kind, &following.kind)
        {
            if outdoor == next_outdoor && side != next_side {
                if let Some(arrival) = graph.outdoor_arrival(*outdoor) {
                    expanded.push(arrival);
                }
            }
        }
    }
    expanded
}

fn lookup(graph: &Graph, id: VertexId) -> Result<&Vertex> {
    let vertex = graph.vertex(id).ok_or_else(|| Error::MalformedVertex {
        vertex: format!("#{id}"),
    })?;
    if !vertex.position.is_finite() {
        return Err(Error::MalformedVertex {
            vertex: vertex.kind.to_string(),
        });
    }
    Ok(vertex)
}

fn group_by_floor(vertices: &[&Vertex]) -> Vec<FloorGroup> {
    let mut groups: Vec<FloorGroup> = Vec::new();
    let mut current: Option<FloorGroup> = None;

    for vertex in vertices {
        let point = RoutePoint {
            x: vertex.position.x,
            y: vertex.position.y,
            vertex: vertex.kind.to_string(),
            floor: vertex.floor,
        };
        match current.as_mut() {
            Some(group) if group.floor == vertex.floor => group.points.push(point),
            _ => {
                if let Some(group) = current.take() {
                    if !group.points.is_empty() {
                        groups.push(group);
                    }
                }
                current = Some(FloorGroup {
                    floor: vertex.floor,
                    points: vec![point],
                });
            }
        }
    }

    if let Some(group) = current {
        groups.push(group);
    }
    groups
}

fn transition_instructions(graph: &Graph, path: &[VertexId], vertices: &[&Vertex]) -> Vec<String> {
    let mut instructions = Vec::new();
    for (index, pair) in path.windows(2).enumerate() {
        let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
            continue;
        };
        let from = vertices[index];
        let to = vertices[index + 1];

        if edge.kind == EdgeKind::Stairs {
            let direction = if to.floor > from.floor { "up" } else { "down" };
            instructions.push(format!(
                "go {direction} via {} to floor {}",
                to.kind, to.floor
            ));
        } else if edge.kind.is_door() {
            if to.outdoor {
                instructions.push(format!("exit building via {}", to.kind));
            } else if from.outdoor {
                instructions.push(format!("enter building via {}", from.kind));
            }
        }
    }
    instructions
}

fn directional_instructions(groups: &[FloorGroup]) -> Vec<String> {
    let mut instructions = Vec::new();
    for group in groups {
        // Bearing of the last step that moved; steps between coincident
        // points keep it and read as forward.
        let mut heading: Option<f64> = None;
        for pair in group.points.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let turn = match bearing(current.position(), next.position()) {
                Some(outgoing) => {
                    let turn = heading.map_or(Turn::Forward, |incoming| {
                        classify_turn(normalize_turn(outgoing - incoming))
                    });
                    heading = Some(outgoing);
                    turn
                }
                None => Turn::Forward,
            };
            instructions.push(format!("{} to {}", turn.phrase(), next.vertex));
        }
    }
    instructions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Side;

    #[test]
    fn turn_boundaries() {
        assert_eq!(classify_turn(45.0), Turn::Forward);
        assert_eq!(classify_turn(-45.0), Turn::Forward);
        assert_eq!(classify_turn(45.01), Turn::Left);
        assert_eq!(classify_turn(135.0), Turn::Left);
        assert_eq!(classify_turn(-45.01), Turn::Right);
        assert_eq!(classify_turn(-135.0), Turn::Right);
        assert_eq!(classify_turn(135.01), Turn::Back);
        assert_eq!(classify_turn(180.0), Turn::Back);
        assert_eq!(classify_turn(-135.01), Turn::Back);
    }

    #[test]
    fn turn_angle_is_signed_and_normalised() {
        let origin = Position::new(0.0, 0.0);
        let east = Position::new(1.0, 0.0);
        assert!((turn_angle(origin, east, Position::new(1.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((turn_angle(origin, east, Position::new(1.0, -1.0)) + 90.0).abs() < 1e-9);
        assert!((turn_angle(origin, east, Position::new(2.0, 0.0))).abs() < 1e-9);
        assert_eq!(turn_angle(origin, east, origin), 180.0);
        assert_eq!(turn_angle(origin, origin, east), 0.0);
    }

    #[test]
    fn coincident_points_keep_the_heading() {
        let mut graph = Graph::new();
        let a = point(&mut graph, "a", 0.0, 4.0, 1);
        let b = point(&mut graph, "b", 0.0, 0.0, 1);
        let door = point(&mut graph, "door", 0.0, -8.0, 1);
        let porch = point(&mut graph, "porch", 0.0, -8.0, 1);
        let gate = point(&mut graph, "gate", 10.0, -60.0, 1);
        let east = point(&mut graph, "east", 30.0, -60.0, 1);

        let narration =
            narrate(&graph, &[a, b, door, porch, gate, east]).expect("narration succeeds");
        assert_eq!(
            narration.instructions,
            vec![
                "go forward to b".to_string(),
                "go forward to door".to_string(),
                "go forward to porch".to_string(),
                "go forward to gate".to_string(),
                "turn left to east".to_string(),
            ]
        );
    }

    fn point(graph: &mut Graph, key: &str, x: f64, y: f64, floor: i32) -> VertexId {
        graph.insert_vertex(Vertex::new(
            VertexKind::Point(key.to_string()),
            Position::new(x, y),
            floor,
        ))
    }

    #[test]
    fn groups_split_on_floor_change() {
        let mut graph = Graph::new();
        let a = point(&mut graph, "a", 0.0, 0.0, 1);
        let b = point(&mut graph, "b", 1.0, 0.0, 1);
        let c = point(&mut graph, "c", 1.0, 0.0, 2);
        let d = point(&mut graph, "d", 1.0, 1.0, 2);

        let narration = narrate(&graph, &[a, b, c, d]).expect("narration succeeds");
        let floors: Vec<_> = narration
            .floors
            .iter()
            .map(|group| (group.floor, group.points.len()))
            .collect();
        assert_eq!(floors, vec![(1, 2), (2, 2)]);
        assert_eq!(narration.floors[1].points[0].vertex, "c");
    }

    #[test]
    fn transitions_precede_directions() {
        let mut graph = Graph::new();
        let a = point(&mut graph, "a", 0.0, 0.0, 1);
        let lower = graph.insert_vertex(Vertex::new(
            VertexKind::StairLanding {
                segment: 2,
                side: Side::Start,
            },
            Position::new(5.0, 0.0),
            1,
        ));
        let upper = graph.insert_vertex(Vertex::new(
            VertexKind::StairLanding {
                segment: 2,
                side: Side::End,
            },
            Position::new(5.0, 0.0),
            2,
        ));
        let b = point(&mut graph, "b", 5.0, 5.0, 2);
        graph.connect(a, lower, EdgeKind::Phantom, 5.0);
        graph.connect(lower, upper, EdgeKind::Stairs, 0.0);
        graph.connect(upper, b, EdgeKind::Phantom, 5.0);

        let narration = narrate(&graph, &[a, lower, upper, b]).expect("narration succeeds");
        assert_eq!(
            narration.instructions,
            vec![
                "go up via phantom_stair_2_end to floor 2".to_string(),
                "go forward to phantom_stair_2_start".to_string(),
                "go forward to b".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_vertex_is_malformed() {
        let mut graph = Graph::new();
        let a = point(&mut graph, "a", 0.0, 0.0, 1);
        let err = narrate(&graph, &[a, 9]).expect_err("vertex 9 does not exist");
        assert!(matches!(err, Error::MalformedVertex { .. }));
    }

    #[test]
    fn non_finite_coordinates_are_malformed() {
        let mut graph = Graph::new();
        let a = point(&mut graph, "a", 0.0, 0.0, 1);
        let b = point(&mut graph, "b", f64::NAN, 0.0, 1);
        let err = narrate(&graph, &[a, b]).expect_err("NaN coordinates");
        assert_eq!(
            err.to_string(),
            "vertex b on route has no usable coordinates"
        );
    }
}
