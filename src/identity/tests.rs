use std::collections::HashSet;

use approx::assert_relative_eq;

use super::*;
use crate::error::ToponymError;
use crate::feature::{BoxFeature, Feature};
use crate::kernel::ShapeModification;
use crate::math::{Point3, Vector3};
use crate::operations::creation::{BoxShapes, MakeBox, MakeCompound};
use crate::operations::modification::SplitFace;
use crate::operations::transform::Translate;
use crate::topology::{Shape, TopologyStore, VertexData};

fn make_box(store: &mut TopologyStore) -> (BoxShapes, Shape) {
    let shapes = MakeBox::new(Point3::origin(), Point3::new(2.0, 2.0, 2.0))
        .execute(store)
        .unwrap();
    let compound = MakeCompound::new(vec![Shape::Solid(shapes.solid)])
        .execute(store)
        .unwrap();
    (shapes, Shape::Compound(compound))
}

fn box_feature(store: &mut TopologyStore) -> BoxFeature {
    let mut feature = BoxFeature::new("box", Point3::origin(), Point3::new(2.0, 2.0, 2.0));
    feature.update(store).unwrap();
    feature
}

fn tag(identity: &ShapeIdentity, name: &str) -> PersistentId {
    identity.tag_store().id(name).unwrap()
}

#[test]
fn set_shape_records_every_sub_shape_once_in_pre_order() {
    let mut store = TopologyStore::new();
    let (_, root) = make_box(&mut store);
    let root_id = PersistentId::random();
    let mut identity = ShapeIdentity::new();
    identity.set_shape(&store, root, root_id).unwrap();

    let kinds: Vec<ShapeKind> = identity.records().map(|r| r.kind).collect();
    assert_eq!(kinds.len(), 35);
    assert_eq!(
        kinds[..7],
        [
            ShapeKind::Compound,
            ShapeKind::Solid,
            ShapeKind::Shell,
            ShapeKind::Face,
            ShapeKind::Wire,
            ShapeKind::Edge,
            ShapeKind::Vertex,
        ]
    );
    let offsets: Vec<usize> = identity.records().map(|r| r.offset).collect();
    assert_eq!(offsets, (0..35).collect::<Vec<_>>());

    assert_eq!(identity.root_shape_id(), root_id);
    assert_eq!(identity.root_shape().unwrap(), &root);
    assert_eq!(identity.all_nil_shapes().len(), 34);
    let distinct: HashSet<Shape> = identity.all_shapes().into_iter().collect();
    assert_eq!(distinct.len(), 35);
}

#[test]
fn failed_decomposition_leaves_identity_null() {
    let mut other = TopologyStore::new();
    let stray = other.add_vertex(VertexData::new(Point3::origin()));
    let store = TopologyStore::new();

    let mut identity = ShapeIdentity::new();
    assert!(identity
        .set_shape(&store, Shape::Vertex(stray), PersistentId::random())
        .is_err());
    assert!(identity.is_null());
    assert!(identity.root_shape_id().is_nil());
    assert!(matches!(
        identity.root_shape(),
        Err(ToponymError::Identity(IdentityError::NullShape))
    ));
}

#[test]
fn lookups_report_missing_entries() {
    let mut store = TopologyStore::new();
    let (_, root) = make_box(&mut store);
    let (other, _) = make_box(&mut store);
    let mut identity = ShapeIdentity::new();
    identity.set_shape(&store, root, PersistentId::random()).unwrap();

    let missing = PersistentId::random();
    assert!(matches!(
        identity.find_shape(missing),
        Err(ToponymError::Identity(IdentityError::IdNotFound(id))) if id == missing
    ));
    assert!(matches!(
        identity.find_id(&Shape::Solid(other.solid)),
        Err(ToponymError::Identity(IdentityError::ShapeNotFound(_)))
    ));
    assert!(!identity.has_shape(&Shape::Solid(other.solid)));
    assert!(identity.update_id(&Shape::Solid(other.solid), missing).is_err());
}

#[test]
fn typed_navigation_on_a_box() {
    let mut store = TopologyStore::new();
    let feature = box_feature(&mut store);
    let identity = feature.identity();
    let edge = tag(identity, "EdgeXNYN");
    let face = tag(identity, "FaceXN");

    assert_eq!(identity.wire_of(edge, face).unwrap(), tag(identity, "WireXN"));
    assert!(identity.is_edge_of_face(edge, face).unwrap());
    assert!(!identity.is_edge_of_face(edge, tag(identity, "FaceXP")).unwrap());
    assert!(identity.faceless_wires(edge).unwrap().is_empty());
    assert!(matches!(
        identity.wire_of(face, face),
        Err(ToponymError::Identity(IdentityError::WrongKind {
            expected: ShapeKind::Edge,
            found: ShapeKind::Face,
        }))
    ));

    let ends: HashSet<PersistentId> = [
        identity.start_vertex(&store, edge).unwrap(),
        identity.end_vertex(&store, edge).unwrap(),
    ]
    .into_iter()
    .collect();
    let expected: HashSet<PersistentId> = [
        tag(identity, "VertexXNYNZN"),
        tag(identity, "VertexXNYNZP"),
    ]
    .into_iter()
    .collect();
    assert_eq!(ends, expected);

    let top = tag(identity, "FaceZP");
    assert_eq!(identity.children_of_type(top, ShapeKind::Vertex).unwrap().len(), 4);
    assert_eq!(identity.children_of_type(top, ShapeKind::Edge).unwrap().len(), 4);
    let corner = tag(identity, "VertexXNYNZN");
    assert_eq!(identity.parents_of_type(corner, ShapeKind::Face).unwrap().len(), 3);
    assert_eq!(identity.parents_of_type(corner, ShapeKind::Solid).unwrap().len(), 1);

    let children = identity.non_compound_children();
    assert_eq!(children, vec![tag(identity, "Solid")]);
}

#[test]
fn point_queries_go_through_the_kernel() {
    let mut store = TopologyStore::new();
    let feature = box_feature(&mut store);
    let identity = feature.identity();
    let edge = tag(identity, "EdgeXNYN");

    let mid = identity.mid_point(&store, edge).unwrap();
    assert_relative_eq!(mid[0], Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    assert_eq!(identity.end_points(&store, edge).unwrap().len(), 2);
    assert!(identity.center_point(&store, edge).unwrap().is_empty());
    assert!(identity.quadrant_points(&store, edge).unwrap().is_empty());

    let top = tag(identity, "FaceZP");
    let nearest = identity
        .nearest_point(&store, top, &Point3::new(1.0, 1.5, 7.0))
        .unwrap();
    assert_relative_eq!(nearest[0], Point3::new(1.0, 1.5, 2.0), epsilon = 1e-9);

    let wire = identity
        .closest_wire(&store, tag(identity, "FaceXN"), &Point3::new(-1.0, 1.0, 1.0))
        .unwrap();
    assert_eq!(wire, tag(identity, "WireXN"));

    assert!(identity.mid_point(&store, top).is_err());
}

#[test]
fn unique_type_match_carries_single_solid_and_shell() {
    let mut store = TopologyStore::new();
    let (shapes, root) = make_box(&mut store);
    let mut source = ShapeIdentity::new();
    source.set_shape(&store, root, PersistentId::random()).unwrap();
    let solid_id = PersistentId::random();
    let shell_id = PersistentId::random();
    source.update_id(&Shape::Solid(shapes.solid), solid_id).unwrap();
    source.update_id(&Shape::Shell(shapes.shell), shell_id).unwrap();

    let (moved, _) = Translate::new(Shape::Solid(shapes.solid), Vector3::x())
        .execute(&mut store)
        .unwrap();
    let compound = MakeCompound::new(vec![moved]).execute(&mut store).unwrap();
    let mut target = ShapeIdentity::new();
    target
        .set_shape(&store, Shape::Compound(compound), PersistentId::random())
        .unwrap();
    target.unique_type_match(&source);

    assert_eq!(target.find_id(&moved).unwrap(), solid_id);
    assert_eq!(target.children_of_type(solid_id, ShapeKind::Shell).unwrap(), vec![shell_id]);
    // Six faces on each side: nothing to pair up.
    let nil_faces = target
        .records()
        .filter(|r| r.kind == ShapeKind::Face && r.id.is_nil())
        .count();
    assert_eq!(nil_faces, 6);
}

#[test]
fn outer_wire_follows_its_face() {
    let mut store = TopologyStore::new();
    let (shapes, root) = make_box(&mut store);
    let side = crate::operations::creation::BoxSide::YP;
    let face_id = PersistentId::random();
    let wire_id = PersistentId::random();

    let mut source = ShapeIdentity::new();
    source.set_shape(&store, root, PersistentId::random()).unwrap();
    source.update_id(&Shape::Face(shapes.face(side)), face_id).unwrap();
    source.update_id(&Shape::Wire(shapes.wire(side)), wire_id).unwrap();

    let mut target = ShapeIdentity::new();
    target.set_shape(&store, root, PersistentId::random()).unwrap();
    target.update_id(&Shape::Face(shapes.face(side)), face_id).unwrap();
    target.outer_wire_match(&source);

    assert_eq!(target.find_id(&Shape::Wire(shapes.wire(side))).unwrap(), wire_id);
}

#[test]
fn derived_ids_are_reproduced() {
    let mut store = TopologyStore::new();
    let (shapes, root) = make_box(&mut store);
    let face_ids: Vec<PersistentId> = (0..6).map(|_| PersistentId::random()).collect();

    let name = |identity: &mut ShapeIdentity| {
        identity.set_shape(&store, root, PersistentId::random()).unwrap();
        for (face, id) in shapes.faces.iter().zip(&face_ids) {
            identity.update_id(&Shape::Face(*face), *id).unwrap();
        }
        identity.derived_match(true);
    };

    let mut identity = ShapeIdentity::new();
    name(&mut identity);
    let nil_kinds: HashSet<ShapeKind> = identity
        .records()
        .filter(|r| r.id.is_nil())
        .map(|r| r.kind)
        .collect();
    assert_eq!(
        nil_kinds,
        [ShapeKind::Solid, ShapeKind::Shell].into_iter().collect()
    );
    // 6 wires, 12 edges, 8 vertices
    assert_eq!(identity.derived_store().len(), 26);
    let births = identity.evolve_store().len();
    let first: Vec<PersistentId> = identity
        .records()
        .filter(|r| r.kind != ShapeKind::Compound)
        .map(|r| r.id)
        .collect();

    name(&mut identity);
    let again: Vec<PersistentId> = identity
        .records()
        .filter(|r| r.kind != ShapeKind::Compound)
        .map(|r| r.id)
        .collect();
    assert_eq!(again, first);
    assert_eq!(identity.evolve_store().len(), births);
    assert_eq!(identity.derived_store().len(), 26);
}

#[test]
fn repair_leaves_distinct_ids() {
    let mut store = TopologyStore::new();
    let (shapes, root) = make_box(&mut store);
    let mut identity = ShapeIdentity::new();
    identity.set_shape(&store, root, PersistentId::random()).unwrap();
    let shared = PersistentId::random();
    let first = Shape::Face(shapes.faces[0]);
    let second = Shape::Face(shapes.faces[1]);
    identity.update_id(&first, shared).unwrap();
    identity.update_id(&second, shared).unwrap();
    assert!(!identity.is_consistent());

    assert_eq!(identity.ensure_no_duplicates(), 1);
    assert_eq!(identity.find_id(&first).unwrap(), shared);
    assert_ne!(identity.find_id(&second).unwrap(), shared);

    assert_eq!(identity.ensure_no_nils(), 32);
    assert!(identity.is_consistent());
    assert_eq!(identity.ensure_no_nils(), 0);
    assert_eq!(identity.ensure_no_duplicates(), 0);
}

#[test]
fn saved_identity_restores_through_json() {
    let mut store = TopologyStore::new();
    let feature = box_feature(&mut store);
    let saved = feature.identity().serial_out();
    let json = saved.to_json().unwrap();
    let loaded = SerialShapeIdentity::from_json(&json).unwrap();
    assert_eq!(loaded, saved);

    let mut restored = ShapeIdentity::new();
    let root = *feature.identity().root_shape().unwrap();
    restored.set_shape(&store, root, PersistentId::nil()).unwrap();
    restored.serial_in(&loaded);

    assert_eq!(restored.all_shape_ids(), feature.identity().all_shape_ids());
    assert_eq!(restored.root_shape_id(), feature.identity().root_shape_id());
    assert_eq!(
        restored.evolve_store().len(),
        feature.identity().evolve_store().len()
    );
    assert_eq!(restored.tag_store().len(), feature.identity().tag_store().len());
    assert_eq!(tag(&restored, "FaceXP"), tag(feature.identity(), "FaceXP"));
}

#[test]
fn replace_id_rewrites_evolve_sources() {
    let mut identity: ShapeIdentity = ShapeIdentity::new();
    let (stale, fresh, out) = (PersistentId::random(), PersistentId::random(), PersistentId::random());
    identity.insert_evolve(stale, out);
    identity.insert_evolve(stale, out);
    assert_eq!(identity.evolve_store().len(), 1);

    identity.replace_id(stale, fresh).unwrap();
    assert!(identity.has_evolve_record(fresh, out));
    assert!(!identity.has_evolve_record_in(stale));
    assert_eq!(identity.devolve(out), vec![fresh]);
    assert!(identity.replace_id(PersistentId::nil(), fresh).is_err());
}

#[test]
fn reconnect_skips_a_removed_feature() {
    let (upstream, removed) = (PersistentId::random(), PersistentId::random());
    let (older, stale, out) = (PersistentId::random(), PersistentId::random(), PersistentId::random());
    let mut history = ShapeHistory::new();
    history.add_shape(upstream, older);
    history.add_shape(removed, stale);
    history.add_connection(stale, older).unwrap();

    let mut identity: ShapeIdentity = ShapeIdentity::new();
    identity.insert_evolve(stale, out);
    let unrelated = PersistentId::random();
    assert_eq!(identity.reconnect(&[stale, unrelated], upstream, &history), 1);
    assert!(identity.has_evolve_record(older, out));
    assert!(!identity.has_evolve_record_in(stale));
}

#[test]
fn work_copy_maps_back_to_the_original() {
    let mut store = TopologyStore::new();
    let feature = box_feature(&mut store);
    let original = feature.identity();
    let copy = original.create_work_copy(&mut store).unwrap();

    assert!(copy.is_consistent());
    assert_eq!(copy.all_shape_ids().len(), original.all_shape_ids().len());
    for id in original.all_shape_ids() {
        assert!(!copy.has_id(id));
        let copied = copy.evolve(id);
        assert_eq!(copied.len(), 1);
        assert!(copy.has_id(copied[0]));
        assert_eq!(copy.devolve(copied[0]), vec![id]);
    }
    let top = tag(original, "FaceZP");
    assert_eq!(copy.kind_of(copy.evolve(top)[0]).unwrap(), ShapeKind::Face);
}

#[test]
fn shared_faces_and_edges_name_their_boundaries() {
    let mut store = TopologyStore::new();
    let feature = box_feature(&mut store);
    let source = feature.identity();
    let solid = *source.find_shape(tag(source, "Solid")).unwrap();
    let (moved, history) = Translate::new(solid, Vector3::y()).execute(&mut store).unwrap();
    let compound = MakeCompound::new(vec![moved]).execute(&mut store).unwrap();

    let mut target = ShapeIdentity::new();
    target
        .set_shape(&store, Shape::Compound(compound), PersistentId::random())
        .unwrap();
    for record in source.records().filter(|r| r.kind == ShapeKind::Face) {
        let copy = history.modified(&record.shape)[0];
        target.update_id(&copy, record.id).unwrap();
    }
    target.face_edge_match(source);
    target.edge_vertex_match(source);

    for record in target.records() {
        match record.kind {
            ShapeKind::Edge | ShapeKind::Vertex => {
                let origin = target.devolve(record.id);
                assert_eq!(origin.len(), 1);
                assert_eq!(source.kind_of(origin[0]).unwrap(), record.kind);
            }
            _ => {}
        }
    }
    let corner = target.evolve(tag(source, "VertexXNYNZN"));
    assert_eq!(corner.len(), 1);
    let point = target.find_shape(corner[0]).unwrap().as_vertex().unwrap();
    assert_relative_eq!(store.vertex(point).unwrap().point, Point3::new(0.0, 1.0, 0.0));
    let edge = tag(source, "EdgeXNYN");
    let moved_edge = target.evolve(edge)[0];
    let mid = target.mid_point(&store, moved_edge).unwrap();
    assert_relative_eq!(mid[0], Point3::new(0.0, 1.0, 1.0), epsilon = 1e-12);
}

#[test]
fn generated_shapes_are_named_by_their_parents() {
    let mut store = TopologyStore::new();
    let feature = box_feature(&mut store);
    let source = feature.identity();
    let solid = source.find_shape(tag(source, "Solid")).unwrap().as_solid().unwrap();
    let top = source.find_shape(tag(source, "FaceZP")).unwrap().as_face().unwrap();
    let (split, history) = SplitFace::new(solid, top).execute(&mut store).unwrap();
    let cut = history.generated(&Shape::Face(top))[0];
    let compound = MakeCompound::new(vec![Shape::Solid(split)]).execute(&mut store).unwrap();

    let mut target = ShapeIdentity::new();
    target
        .set_shape(&store, Shape::Compound(compound), PersistentId::random())
        .unwrap();
    target.shape_match(source);
    target.modified_match(&history, source);
    assert!(target.find_id(&cut).unwrap().is_nil());

    target.derived_match(true);
    let cut_id = target.find_id(&cut).unwrap();
    assert!(!cut_id.is_nil());
    assert_eq!(target.devolve(cut_id), vec![PersistentId::nil()]);
    assert!(!target.has_evolve_record(tag(source, "FaceZP"), cut_id));
}

#[test]
fn feature_tags_are_bound_once() {
    let mut identity: ShapeIdentity = ShapeIdentity::new();
    let id = identity.feature_tag_id("Top");
    assert_eq!(identity.feature_tag_id("Top"), id);
    assert!(identity.has_evolve_record(PersistentId::nil(), id));
    assert_eq!(identity.feature_tag(id).unwrap(), "Top");

    assert!(matches!(
        identity.insert_feature_tag(PersistentId::random(), "Top"),
        Err(ToponymError::Identity(IdentityError::TagConflict { .. }))
    ));
    assert!(identity.insert_feature_tag(id, "Bottom").is_err());
    assert!(identity.insert_feature_tag(id, "Top").is_ok());
    assert!(matches!(
        identity.feature_tag(PersistentId::random()),
        Err(ToponymError::Identity(IdentityError::TagNotFound(_)))
    ));
}

#[test]
fn graph_dump_lists_containment() {
    let mut store = TopologyStore::new();
    let feature = box_feature(&mut store);
    let identity = feature.identity();

    let mut dot = String::new();
    identity.dump_graph(&mut dot).unwrap();
    assert!(dot.starts_with("digraph shape {"));
    assert!(dot.contains("n0 -> n1;"));
    assert!(dot.contains(&identity.root_shape_id().to_string()));

    let mut reverse = String::new();
    identity.dump_reverse_graph(&mut reverse).unwrap();
    assert!(reverse.contains("n1 -> n0;"));
    assert!(!reverse.contains("n0 -> n1;"));

    let text = identity.to_string();
    assert!(text.starts_with("shape records (35)"));
}
