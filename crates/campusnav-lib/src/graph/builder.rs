//! Assemble a [`Graph`] from a [`MapSnapshot`].
//!
//! Rooms go in first, then indoor segments (stairways become a pair of
//! landing phantoms), then outdoor segments, then connection records.
//! Records that point at missing entities are logged and skipped so a
//! partially edited map still produces a usable graph.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geometry::{align_door, project_onto_segment, Position};
use crate::model::{
    BuildingId, ConnectionKind, Endpoint, MapSnapshot, OutdoorId, PointKind, RoomId, SegmentId,
};

use super::{EdgeKind, Graph, Side, Vertex, VertexId, VertexKind};

/// Lowest cost charged for walking through a building entrance.
pub const MIN_TRANSITION_WEIGHT: f64 = 10.0;

/// Coordinates closer than this are treated as the same tap location.
const SAME_SPOT: f64 = 1e-9;

/// Resolved geometry of an indoor segment.
#[derive(Debug, Clone, Copy)]
struct SegmentGeometry {
    start: Position,
    end: Position,
    floor: i32,
    building_id: Option<BuildingId>,
    ends: (VertexId, VertexId),
    landings: Option<(VertexId, VertexId)>,
}

/// Build a navigation graph from an entity snapshot.
pub fn build_graph(snapshot: &MapSnapshot) -> Result<Graph> {
    GraphBuilder::new(snapshot).build()
}

/// Single-use builder turning one snapshot into one graph.
pub struct GraphBuilder<'a> {
    snapshot: &'a MapSnapshot,
    graph: Graph,
    segments: BTreeMap<SegmentId, SegmentGeometry>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(snapshot: &'a MapSnapshot) -> Self {
        Self {
            snapshot,
            graph: Graph::new(),
            segments: BTreeMap::new(),
        }
    }

    /// Run every build stage and hand back the graph.
    ///
    /// Fails only when connections are present but there is no room, segment
    /// or outdoor segment for them to connect.
    pub fn build(mut self) -> Result<Graph> {
        if !self.snapshot.connections.is_empty() && self.snapshot.has_no_entities() {
            return Err(Error::InvalidInput {
                message: format!(
                    "{} connections supplied without rooms, segments or outdoor segments",
                    self.snapshot.connections.len()
                ),
            });
        }

        self.add_rooms();
        self.add_segments();
        self.add_outdoor_segments();
        self.add_connections();

        debug!(
            vertices = self.graph.len(),
            edges = self.graph.edge_count() / 2,
            segments = self.segments.len(),
            "built navigation graph"
        );
        Ok(self.graph)
    }

    fn add_rooms(&mut self) {
        let snapshot = self.snapshot;
        for (&id, room) in &snapshot.rooms {
            self.graph.insert_vertex(
                Vertex::new(VertexKind::Room(id), room.position(), room.floor)
                    .in_building(room.building_id),
            );
        }
    }

    fn add_segments(&mut self) {
        let snapshot = self.snapshot;
        for (&id, ends) in &snapshot.segments {
            let (Some(start), Some(end)) = (
                self.resolve_endpoint(&ends.start),
                self.resolve_endpoint(&ends.end),
            ) else {
                warn!(
                    error = %missing("segment", id),
                    start = %ends.start,
                    end = %ends.end,
                    "skipping segment with unresolved endpoint"
                );
                continue;
            };

            let start_vertex = self.vertex(start).clone();
            let end_vertex = self.vertex(end).clone();
            let distance = start_vertex.position.distance_to(&end_vertex.position);

            let landings = if self.is_stair(&ends.start) || self.is_stair(&ends.end) {
                let lower = self.graph.insert_vertex(
                    Vertex::new(
                        VertexKind::StairLanding {
                            segment: id,
                            side: Side::Start,
                        },
                        start_vertex.position,
                        start_vertex.floor,
                    )
                    .in_building(start_vertex.building_id),
                );
                let upper = self.graph.insert_vertex(
                    Vertex::new(
                        VertexKind::StairLanding {
                            segment: id,
                            side: Side::End,
                        },
                        end_vertex.position,
                        end_vertex.floor,
                    )
                    .in_building(end_vertex.building_id),
                );
                self.graph.connect(lower, upper, EdgeKind::Stairs, distance);
                self.graph.connect(start, lower, EdgeKind::Phantom, 0.0);
                self.graph.connect(end, upper, EdgeKind::Phantom, 0.0);
                self.register_phantom(id, lower);
                self.register_phantom(id, upper);
                Some((lower, upper))
            } else {
                let kind = if matches!(ends.start, Endpoint::Room(_))
                    || matches!(ends.end, Endpoint::Room(_))
                {
                    EdgeKind::Room
                } else {
                    EdgeKind::Segment
                };
                self.graph.connect(start, end, kind, distance);
                None
            };

            self.segments.insert(
                id,
                SegmentGeometry {
                    start: start_vertex.position,
                    end: end_vertex.position,
                    floor: start_vertex.floor,
                    building_id: start_vertex.building_id,
                    ends: (start, end),
                    landings,
                },
            );
        }
    }

    fn add_outdoor_segments(&mut self) {
        let snapshot = self.snapshot;
        for (&id, ends) in &snapshot.outdoor_segments {
            let (Some(start), Some(end)) = (
                self.resolve_endpoint(&ends.start),
                self.resolve_endpoint(&ends.end),
            ) else {
                warn!(
                    error = %missing("outdoor segment", id),
                    start = %ends.start,
                    end = %ends.end,
                    "skipping outdoor segment with unresolved endpoint"
                );
                continue;
            };

            let distance = self.distance(start, end);
            let kind = if self.is_entrance(&ends.start) || self.is_entrance(&ends.end) {
                EdgeKind::Building
            } else {
                EdgeKind::Outdoor
            };
            self.graph.connect(start, end, kind, distance);
        }
    }

    fn add_connections(&mut self) {
        let snapshot = self.snapshot;
        for (&id, connection) in &snapshot.connections {
            let outcome = match connection.kind() {
                Some(ConnectionKind::RoomTap { room, segment }) => self.add_room_tap(room, segment),
                Some(ConnectionKind::Transition { outdoor, segment }) => {
                    self.add_transition(outdoor, segment, connection.weight)
                }
                Some(ConnectionKind::LandingLink { from, segment }) => {
                    self.add_landing_link(from, segment)
                }
                None => Err(missing("connection", id)),
            };

            if let Err(err) = outcome {
                warn!(connection = id, error = %err, "skipping connection");
            }
        }
    }

    /// Project a room onto a corridor and hang it off a tap phantom.
    fn add_room_tap(&mut self, room: RoomId, segment: SegmentId) -> Result<()> {
        let room_id = self
            .graph
            .vertex_id(&VertexKind::Room(room))
            .ok_or_else(|| missing("room", room))?;
        let geometry = self.geometry(segment)?;
        let room_vertex = self.vertex(room_id).clone();

        let projection = project_onto_segment(room_vertex.position, geometry.start, geometry.end);
        let tap = self.tap_onto(
            segment,
            projection.point,
            room_vertex.floor,
            room_vertex.building_id,
        );
        self.graph.connect(
            room_id,
            tap,
            EdgeKind::Phantom,
            room_vertex.position.distance_to(&projection.point),
        );
        Ok(())
    }

    /// Walk an outdoor segment up to its door and through it onto a corridor.
    fn add_transition(
        &mut self,
        outdoor: OutdoorId,
        segment: SegmentId,
        weight: Option<f64>,
    ) -> Result<()> {
        let snapshot = self.snapshot;
        let ends = snapshot
            .outdoor_segments
            .get(&outdoor)
            .ok_or_else(|| missing("outdoor segment", outdoor))?;
        let far_real = self
            .resolve_endpoint(&ends.start)
            .ok_or_else(|| missing("outdoor segment", outdoor))?;
        let arrival_real = self
            .resolve_endpoint(&ends.end)
            .ok_or_else(|| missing("outdoor segment", outdoor))?;
        let geometry = self.geometry(segment)?;

        let far_vertex = self.vertex(far_real).clone();
        let arrival_vertex = self.vertex(arrival_real).clone();
        let projection =
            project_onto_segment(arrival_vertex.position, geometry.start, geometry.end);
        let door_position = align_door(arrival_vertex.position, projection.point);

        let far = self.graph.insert_vertex(
            Vertex::new(
                VertexKind::OutdoorEndpoint {
                    outdoor,
                    side: Side::Start,
                },
                far_vertex.position,
                far_vertex.floor,
            )
            .in_building(far_vertex.building_id),
        );
        let door = self.graph.insert_vertex(
            Vertex::new(
                VertexKind::OutdoorEndpoint {
                    outdoor,
                    side: Side::End,
                },
                door_position,
                arrival_vertex.floor,
            )
            .in_building(arrival_vertex.building_id),
        );
        let tap = self.tap_onto(
            segment,
            projection.point,
            geometry.floor,
            geometry.building_id,
        );

        let door_position = self.vertex(door).position;
        self.graph.connect(far_real, far, EdgeKind::Phantom, 0.0);
        self.graph.connect(
            far,
            door,
            EdgeKind::Outdoor,
            far_vertex.position.distance_to(&door_position),
        );
        self.graph.connect(
            arrival_real,
            door,
            EdgeKind::Phantom,
            arrival_vertex.position.distance_to(&door_position),
        );
        self.graph.connect(
            door,
            tap,
            EdgeKind::Transition,
            weight.unwrap_or(0.0).max(MIN_TRANSITION_WEIGHT),
        );
        self.graph.set_outdoor_arrival(outdoor, arrival_real);
        Ok(())
    }

    /// Drop the ends (or landings) of one segment onto a corridor on the same floor.
    fn add_landing_link(&mut self, from: SegmentId, segment: SegmentId) -> Result<()> {
        let source = self.geometry(from)?;
        let target = self.geometry(segment)?;
        let (first, second) = source.landings.unwrap_or(source.ends);

        let mut linked = 0usize;
        for landing in [first, second] {
            let vertex = self.vertex(landing).clone();
            if vertex.floor != target.floor {
                continue;
            }
            let projection = project_onto_segment(vertex.position, target.start, target.end);
            let tap = self.tap_onto(segment, projection.point, vertex.floor, target.building_id);
            self.graph.connect(
                landing,
                tap,
                EdgeKind::Phantom,
                vertex.position.distance_to(&projection.point),
            );
            linked += 1;
        }

        if linked == 0 {
            return Err(Error::MissingReference {
                entity: "landing on floor of segment",
                id: segment.to_string(),
            });
        }
        Ok(())
    }

    /// Reuse the clique member already at `position`, or create a new tap there.
    fn tap_onto(
        &mut self,
        segment: SegmentId,
        position: Position,
        floor: i32,
        building_id: Option<BuildingId>,
    ) -> VertexId {
        let existing = self.graph.clique(segment).iter().copied().find(|&id| {
            let vertex = self.vertex(id);
            vertex.floor == floor && vertex.position.distance_to(&position) <= SAME_SPOT
        });
        if let Some(id) = existing {
            return id;
        }

        let index = self.graph.clique(segment).len();
        let tap = self.graph.insert_vertex(
            Vertex::new(VertexKind::Tap { segment, index }, position, floor)
                .in_building(building_id),
        );

        if let Some(geometry) = self.segments.get(&segment).copied() {
            for end in [geometry.ends.0, geometry.ends.1] {
                let vertex = self.vertex(end);
                if vertex.floor == floor {
                    let distance = vertex.position.distance_to(&position);
                    self.graph.connect(tap, end, EdgeKind::Segment, distance);
                }
            }
        }
        self.register_phantom(segment, tap);
        tap
    }

    /// Add a phantom to a segment's clique and wire it to every other member.
    ///
    /// Members on other floors are joined too; a stairway's landings end up
    /// with both their `stairs` edge and a `segment` edge of equal weight.
    fn register_phantom(&mut self, segment: SegmentId, phantom: VertexId) {
        let members = self.graph.clique(segment).to_vec();
        if members.contains(&phantom) {
            return;
        }

        let position = self.vertex(phantom).position;
        for other in members {
            let distance = position.distance_to(&self.vertex(other).position);
            self.graph.connect(phantom, other, EdgeKind::Segment, distance);
        }
        self.graph.clique_mut(segment).push(phantom);
    }

    fn resolve_endpoint(&mut self, endpoint: &Endpoint) -> Option<VertexId> {
        match endpoint {
            Endpoint::Room(id) => self.graph.vertex_id(&VertexKind::Room(*id)),
            Endpoint::Point(key) => {
                let point = self.snapshot.points.get(key)?;
                let mut vertex =
                    Vertex::new(VertexKind::Point(key.clone()), point.position(), point.floor)
                        .in_building(point.building_id);
                if point.kind == PointKind::Outdoor {
                    vertex = vertex.outdoors();
                }
                Some(self.graph.insert_vertex(vertex))
            }
        }
    }

    fn point_kind(&self, endpoint: &Endpoint) -> Option<PointKind> {
        match endpoint {
            Endpoint::Point(key) => self.snapshot.points.get(key).map(|point| point.kind),
            Endpoint::Room(_) => None,
        }
    }

    fn is_stair(&self, endpoint: &Endpoint) -> bool {
        self.point_kind(endpoint) == Some(PointKind::Stair)
    }

    fn is_entrance(&self, endpoint: &Endpoint) -> bool {
        self.point_kind(endpoint) == Some(PointKind::Entrance)
    }

    fn geometry(&self, segment: SegmentId) -> Result<SegmentGeometry> {
        self.segments
            .get(&segment)
            .copied()
            .ok_or_else(|| missing("segment", segment))
    }

    // Ids handed to this helper always come from `insert_vertex` or `vertex_id`.
    fn vertex(&self, id: VertexId) -> &Vertex {
        &self.graph.vertices[id]
    }

    fn distance(&self, a: VertexId, b: VertexId) -> f64 {
        self.vertex(a).position.distance_to(&self.vertex(b).position)
    }
}

fn missing(entity: &'static str, id: impl ToString) -> Error {
    Error::MissingReference {
        entity,
        id: id.to_string(),
    }
}
