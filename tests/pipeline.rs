//! Payload to framed camera, the way the page drives it.

use company_graph_3d::camera::{self, CameraConfig, CameraPose};
use company_graph_3d::error::ApiError;
use company_graph_3d::graph::{self, LoadNotice};
use company_graph_3d::interaction::{match_nodes, resolve_submission, retain_focus};
use company_graph_3d::layout::layout;
use glam::DVec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

fn payload() -> serde_json::Value {
	json!({
		"nodes": [
			{"id": "N1", "data": {"label": "Northwind", "sector": "Logistics"}},
			{"id": "N2", "name": "Contoso"},
			{"id": "N3"}
		],
		"edges": [
			{"source": "N1", "target": "N2", "strength": 0.5},
			{"source": "N2", "target": "N3"}
		]
	})
}

fn average_linked_distance(nodes: &[graph::Node]) -> f64 {
	(nodes[0].position.distance(nodes[1].position) + nodes[1].position.distance(nodes[2].position)) / 2.0
}

#[test]
fn hydrate_then_layout_pulls_links_together() {
	let mut rng = StdRng::seed_from_u64(42);
	let hydrated = graph::hydrate(&payload(), &mut rng);

	assert_eq!(hydrated.nodes.len(), 3);
	let labels: Vec<&str> = hydrated.nodes.iter().map(|n| n.data.label.as_str()).collect();
	assert_eq!(labels[0], "Northwind");
	assert_eq!(labels[1], "Contoso");
	assert!(!labels[2].trim().is_empty());
	let strengths: Vec<Option<f64>> = hydrated.edges.iter().map(|e| e.strength).collect();
	assert_eq!(strengths, vec![Some(0.5), None]);

	// Spread the start far beyond the link rest length.
	let mut spread = hydrated.nodes.clone();
	for (i, node) in spread.iter_mut().enumerate() {
		node.position = node.position + DVec3::new(i as f64 * 30.0, 0.0, 0.0);
	}
	let before = average_linked_distance(&spread);
	let laid_out = layout(&spread, &hydrated.edges, None);

	assert!(laid_out.iter().all(|n| n.position.is_finite()));
	assert!(average_linked_distance(&laid_out) < before);
}

#[test]
fn loaded_graph_frames_and_focuses() {
	let mut rng = StdRng::seed_from_u64(7);
	let load = graph::load_graph(Ok(payload()), &mut rng);
	assert!(load.notice.is_none());
	let config = CameraConfig::default();

	let sphere = camera::compute_bounding_sphere_with(&load.data.nodes, &config).unwrap();
	let fitted = camera::fit_camera(&CameraPose::default(), &sphere, &config);
	assert_eq!(fitted.look_at, sphere.center);
	assert!(fitted.distance() >= config.fit_min_distance);

	let pick = resolve_submission(&load.data.nodes, "contoso").unwrap();
	assert_eq!(pick.node_id, "N2");
	let target = load.data.node(&pick.node_id).unwrap();
	let focused = camera::focus_camera(&fitted, target, Some(sphere.radius), &config);
	assert_eq!(focused.look_at, target.position);
	assert!(focused.distance() < fitted.distance() + sphere.radius);
}

#[test]
fn failed_fetch_shows_sample_and_drops_stale_focus() {
	let mut rng = StdRng::seed_from_u64(3);
	let load = graph::load_graph(Err(ApiError::Request("connection refused".into())), &mut rng);
	assert!(matches!(load.notice, Some(LoadNotice::Unavailable(_))));
	assert_eq!(load.data.nodes.len(), graph::sample::SAMPLE_NODE_COUNT);
	assert!(load.data.nodes.iter().all(|n| n.position.is_finite()));

	assert_eq!(retain_focus(Some("N2".into()), &load.data.nodes), None);
	assert_eq!(
		retain_focus(Some("node-1".into()), &load.data.nodes).as_deref(),
		Some("node-1")
	);
	assert!(match_nodes(&load.data.nodes, "node-1", 8).len() <= 8);
}

#[test]
fn empty_payload_falls_back_with_notice() {
	let mut rng = StdRng::seed_from_u64(9);
	let load = graph::load_graph(Ok(json!({"nodes": [{"id": "lonely"}], "edges": []})), &mut rng);
	assert_eq!(load.notice, Some(LoadNotice::Empty));
	assert!(!load.data.edges.is_empty());
}
