//! Tool provider: catalog plus dispatch
//!
//! [`MapToolProvider`] is what an agent loop talks to. It hands out the
//! tool catalog, and for each call it looks the tool up, coerces the
//! parameters into a [`MapCommand`](crate::MapCommand) and queues it for
//! the surface thread. Every failure comes back as a [`ToolOutcome`]
//! value; nothing is raised to the caller.
//!
//! # Example
//!
//! ```
//! use mapkit_core::MemorySurface;
//! use mapkit_tools::{MapToolProvider, ToolProvider};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let provider = MapToolProvider::new(MemorySurface::new()).unwrap();
//! let outcome = provider
//!     .execute("pan_map_to_location", &json!({"latitude": 51.5, "longitude": -0.12}))
//!     .await;
//! assert!(outcome.is_success());
//! # });
//! ```

use crate::command::ApplySettings;
use crate::layers::LayerSummary;
use crate::registry::ToolRegistry;
use crate::schema::ToolDefinition;
use crate::worker::{Job, SurfaceWorker};
use async_trait::async_trait;
use mapkit_core::{DrawingSurface, Error, Params, Result, ToolOutcome};
use mapkit_utils::{DispatchMode, MapkitConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// A tool invocation requested by a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name
    pub name: String,

    /// Raw arguments
    #[serde(default, alias = "arguments", alias = "input")]
    pub params: Value,
}

impl ToolCall {
    /// Create a tool call
    pub fn new(name: impl Into<String>, params: Value) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Something that offers tools to a model and executes them
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Definitions of every tool this provider can execute
    fn tools_for_llm(&self) -> Vec<ToolDefinition>;

    /// Execute a tool by name
    ///
    /// Never fails: errors are reported through [`ToolOutcome::Error`].
    async fn execute(&self, name: &str, params: &Value) -> ToolOutcome;
}

/// Map tool provider backed by a drawing surface on its own thread
#[derive(Debug)]
pub struct MapToolProvider {
    registry: ToolRegistry,
    worker: SurfaceWorker,
    mode: DispatchMode,
}

impl MapToolProvider {
    /// Create a provider with the default configuration
    pub fn new<S>(surface: S) -> Result<Self>
    where
        S: DrawingSurface + 'static,
    {
        Self::with_config(surface, &MapkitConfig::default())
    }

    /// Create a provider with the given configuration
    ///
    /// Spawns the surface thread; the surface is moved onto it and is only
    /// touched from there.
    pub fn with_config<S>(surface: S, config: &MapkitConfig) -> Result<Self>
    where
        S: DrawingSurface + 'static,
    {
        let worker = SurfaceWorker::spawn(
            Box::new(surface),
            config.queue_capacity,
            ApplySettings::from(config),
        )?;

        info!(
            mode = ?config.dispatch_mode,
            style_change = ?config.style_change,
            "Map tool provider ready"
        );

        Ok(Self {
            registry: ToolRegistry::builtin(),
            worker,
            mode: config.dispatch_mode,
        })
    }

    /// How calls report their outcome
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Execute calls one after another, in order
    pub async fn execute_all(&self, calls: &[ToolCall]) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls {
            outcomes.push(self.execute(&call.name, &call.params).await);
        }
        outcomes
    }

    /// Layers as seen after every previously queued call has run
    pub async fn layers(&self) -> Result<Vec<LayerSummary>> {
        let (reply, rx) = oneshot::channel();
        self.worker.submit(Job::Layers { reply }).await?;
        rx.await.map_err(|_| Error::WorkerStopped)
    }

    /// Wait until every previously queued call has run
    pub async fn flush(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.worker.submit(Job::Flush { reply }).await?;
        rx.await.map_err(|_| Error::WorkerStopped)
    }

    async fn dispatch(&self, name: &str, params: &Value) -> Result<String> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        let command = tool.plan(&Params::from_value(params)?)?;
        debug!(tool_name = %name, ?command, "Parameters coerced");

        match self.mode {
            DispatchMode::Deferred => {
                let message = command.accepted_message();
                self.worker
                    .submit(Job::Apply {
                        tool: tool.name(),
                        command,
                        reply: None,
                    })
                    .await?;
                Ok(message)
            }
            DispatchMode::AwaitCompletion => {
                let (reply, rx) = oneshot::channel();
                self.worker
                    .submit(Job::Apply {
                        tool: tool.name(),
                        command,
                        reply: Some(reply),
                    })
                    .await?;
                Ok(rx.await.map_err(|_| Error::WorkerStopped)??)
            }
        }
    }
}

#[async_trait]
impl ToolProvider for MapToolProvider {
    fn tools_for_llm(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    async fn execute(&self, name: &str, params: &Value) -> ToolOutcome {
        debug!(tool_name = %name, "Executing tool");

        match self.dispatch(name, params).await {
            Ok(message) => {
                info!(tool_name = %name, %message, "Tool call accepted");
                ToolOutcome::success(message)
            }
            Err(err) => {
                warn!(tool_name = %name, code = %err.code(), error = %err, "Tool call failed");
                err.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapkit_core::{
        BoundingBox, CameraAnimation, CameraPosition, ErrorCode, FeatureKind, GroupId, LngLat,
        Marker, MemorySurface, Polygon, Polyline, SurfaceError, SurfaceResult,
    };
    use mapkit_utils::StyleChangePolicy;
    use mockall::mock;
    use serde_json::json;

    mock! {
        pub Surface {}

        impl DrawingSurface for Surface {
            fn create_group(&mut self, kind: FeatureKind, name: &str) -> SurfaceResult<GroupId>;
            fn add_markers(&mut self, group: GroupId, markers: &[Marker]) -> SurfaceResult<()>;
            fn add_polyline(&mut self, group: GroupId, line: &Polyline) -> SurfaceResult<()>;
            fn add_polygon(&mut self, group: GroupId, polygon: &Polygon) -> SurfaceResult<()>;
            fn delete_group(&mut self, group: GroupId) -> SurfaceResult<()>;
            fn camera(&self) -> CameraPosition;
            fn move_camera(
                &mut self,
                camera: CameraPosition,
                animation: CameraAnimation,
            ) -> SurfaceResult<()>;
            fn camera_for_bounds(
                &self,
                bounds: &BoundingBox,
                padding: f64,
            ) -> SurfaceResult<CameraPosition>;
            fn load_style(&mut self, style_url: &str) -> SurfaceResult<()>;
        }
    }

    fn await_config() -> MapkitConfig {
        MapkitConfig::builder()
            .dispatch_mode(DispatchMode::AwaitCompletion)
            .build()
            .unwrap()
    }

    fn provider() -> (MapToolProvider, MemorySurface) {
        let surface = MemorySurface::new();
        let provider = MapToolProvider::new(surface.clone()).unwrap();
        (provider, surface)
    }

    #[tokio::test]
    async fn test_catalog_matches_registry() {
        let (provider, _) = provider();
        assert_eq!(provider.tools_for_llm(), crate::tools_for_llm());
        assert_eq!(provider.mode(), DispatchMode::Deferred);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (provider, surface) = provider();

        let outcome = provider.execute("draw_unicorn", &json!({})).await;
        assert_eq!(outcome.code(), Some(ErrorCode::UnknownTool));

        provider.flush().await.unwrap();
        assert!(surface.snapshot().groups.is_empty());
    }

    #[tokio::test]
    async fn test_missing_points_leaves_store_unchanged() {
        let (provider, surface) = provider();

        let outcome = provider
            .execute("add_points_to_map", &json!({"layerName": "cities"}))
            .await;
        assert_eq!(outcome.code(), Some(ErrorCode::InvalidParams));
        assert!(outcome.content().contains("points"));

        assert!(provider.layers().await.unwrap().is_empty());
        assert!(surface.snapshot().groups.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_params() {
        let (provider, _) = provider();
        let outcome = provider.execute("set_map_style", &json!("dark")).await;
        assert_eq!(outcome.code(), Some(ErrorCode::InvalidParams));

        // null is an empty argument object
        let outcome = provider.execute("clear_map_layers", &Value::Null).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_add_single_point() {
        let (provider, surface) = provider();

        let outcome = provider
            .execute(
                "add_points_to_map",
                &json!({"points": [{"lat": 40.7128, "lng": -74.0060, "title": "NYC"}]}),
            )
            .await;
        assert!(outcome.is_success());
        assert!(outcome.content().contains('1'));

        provider.flush().await.unwrap();
        let state = surface.snapshot();
        let group = state.group(FeatureKind::Point, "points").unwrap();
        assert_eq!(group.markers.len(), 1);
        assert_eq!(group.markers[0].position, LngLat::new(-74.0060, 40.7128));
        assert_eq!(group.markers[0].title.as_deref(), Some("NYC"));
    }

    #[tokio::test]
    async fn test_get_or_create_appends() {
        let (provider, surface) = provider();
        let params = json!({"points": [{"lat": 1, "lng": 1}], "layerName": "cities"});

        provider.execute("add_points_to_map", &params).await;
        provider.execute("add_points_to_map", &params).await;

        let layers = provider.layers().await.unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].points, Some(2));

        let state = surface.snapshot();
        let groups = state.groups_named(FeatureKind::Point, "cities");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].markers.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let (provider, surface) = provider();

        provider
            .execute("add_points_to_map", &json!({"points": [{"lat": 0, "lng": 0}], "layerName": "cities"}))
            .await;
        provider
            .execute("add_route_to_map", &json!({"coordinates": [[0, 0], [1, 1]]}))
            .await;
        assert_eq!(provider.layers().await.unwrap().len(), 2);

        let outcome = provider.execute("clear_map_layers", &json!({})).await;
        assert!(outcome.is_success());

        assert!(provider.layers().await.unwrap().is_empty());
        assert!(surface.snapshot().groups.is_empty());
    }

    #[tokio::test]
    async fn test_clear_unknown_name_is_noop() {
        let (provider, surface) = provider();

        provider
            .execute("add_route_to_map", &json!({"coordinates": [[0, 0], [1, 1]]}))
            .await;
        let outcome = provider
            .execute("clear_map_layers", &json!({"layerNames": ["cities"]}))
            .await;
        assert!(outcome.is_success());

        let names: Vec<_> = provider
            .layers()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["route"]);
        assert!(surface.snapshot().group(FeatureKind::Line, "route").is_some());
    }

    #[tokio::test]
    async fn test_fit_bounds_frames_box() {
        let (provider, surface) = provider();

        for coords in [json!([[0, 0], [2, 2]]), json!([[2, 2], [0, 0]])] {
            let outcome = provider
                .execute("fit_map_to_bounds", &json!({"coordinates": coords, "padding": 50}))
                .await;
            assert!(outcome.is_success());
        }

        provider.flush().await.unwrap();
        let state = surface.snapshot();
        assert_eq!(state.camera_moves.len(), 2);
        assert_eq!(state.camera_moves[0], state.camera_moves[1]);
        assert_eq!(state.camera.center, LngLat::new(1.0, 1.0));
    }

    #[tokio::test]
    async fn test_bad_color_still_succeeds() {
        let (provider, surface) = provider();

        let outcome = provider
            .execute(
                "add_points_to_map",
                &json!({"points": [{"lat": 0, "lng": 0}], "iconColor": "not-a-color"}),
            )
            .await;
        assert!(outcome.is_success());

        provider.flush().await.unwrap();
        let state = surface.snapshot();
        let marker = &state.group(FeatureKind::Point, "points").unwrap().markers[0];
        assert_eq!(marker.color, crate::tools::points::DEFAULT_ICON_COLOR);
    }

    #[tokio::test]
    async fn test_calls_apply_in_order() {
        let (provider, surface) = provider();

        let calls = vec![
            ToolCall::new("add_points_to_map", json!({"points": [{"lat": 0, "lng": 0}], "layerName": "a"})),
            ToolCall::new("clear_map_layers", json!({"layerNames": ["a"]})),
            ToolCall::new("add_points_to_map", json!({"points": [{"lat": 0, "lng": 0}], "layerName": "b"})),
            ToolCall::new("pan_map_to_location", json!({"latitude": 10, "longitude": 20, "zoom": 4})),
        ];
        let outcomes = provider.execute_all(&calls).await;
        assert!(outcomes.iter().all(ToolOutcome::is_success));

        provider.flush().await.unwrap();
        let state = surface.snapshot();
        assert!(state.group(FeatureKind::Point, "a").is_none());
        assert!(state.group(FeatureKind::Point, "b").is_some());
        assert_eq!(state.camera, CameraPosition::new(LngLat::new(20.0, 10.0), 4.0));
    }

    #[tokio::test]
    async fn test_adapter_fault_reported_when_awaiting() {
        let mut surface = MockSurface::new();
        surface
            .expect_create_group()
            .returning(|_, _| Ok(GroupId(1)));
        surface
            .expect_add_markers()
            .returning(|_, _| Err(SurfaceError::rejected("add_markers", "icon atlas full")));
        surface.expect_delete_group().times(1).returning(|_| Ok(()));

        let provider = MapToolProvider::with_config(surface, &await_config()).unwrap();
        let outcome = provider
            .execute("add_points_to_map", &json!({"points": [{"lat": 0, "lng": 0}]}))
            .await;

        assert_eq!(outcome.code(), Some(ErrorCode::ExecutionError));
        assert!(outcome.content().contains("icon atlas full"));
        assert!(provider.layers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adapter_panic_during_add_discards_group() {
        let mut surface = MockSurface::new();
        surface
            .expect_create_group()
            .times(1)
            .returning(|_, _| Ok(GroupId(7)));
        surface
            .expect_add_markers()
            .returning(|_, _| panic!("marker renderer crashed"));
        surface
            .expect_delete_group()
            .withf(|group| *group == GroupId(7))
            .times(1)
            .returning(|_| Ok(()));

        let provider = MapToolProvider::with_config(surface, &await_config()).unwrap();
        let outcome = provider
            .execute("add_points_to_map", &json!({"points": [{"lat": 0, "lng": 0}]}))
            .await;
        assert_eq!(outcome.code(), Some(ErrorCode::ExecutionError));
        assert!(outcome.content().contains("marker renderer crashed"));
        assert!(provider.layers().await.unwrap().is_empty());

        // Nothing tracked, so clearing touches no group
        let outcome = provider.execute("clear_map_layers", &json!({})).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_kept_layers_survive_style_reload() {
        let surface = MemorySurface::new();
        let config = MapkitConfig::builder()
            .dispatch_mode(DispatchMode::AwaitCompletion)
            .style_change(StyleChangePolicy::KeepLayers)
            .build()
            .unwrap();
        let provider = MapToolProvider::with_config(surface.clone(), &config).unwrap();
        let params = json!({"points": [{"lat": 1, "lng": 1}], "layerName": "cities"});

        assert!(provider.execute("add_points_to_map", &params).await.is_success());
        let outcome = provider
            .execute("set_map_style", &json!({"styleUrl": "mapbox://styles/mapbox/dark-v11"}))
            .await;
        assert!(outcome.is_success());

        for _ in 0..2 {
            let outcome = provider.execute("add_points_to_map", &params).await;
            assert!(outcome.is_success(), "{}", outcome.content());
        }

        let state = surface.snapshot();
        assert_eq!(state.groups.len(), 1);
        assert_eq!(state.groups_named(FeatureKind::Point, "cities")[0].markers.len(), 2);
        let layers = provider.layers().await.unwrap();
        assert_eq!(layers[0].points, Some(2));
    }

    #[tokio::test]
    async fn test_adapter_fault_logged_when_deferred() {
        let mut surface = MockSurface::new();
        surface
            .expect_load_style()
            .returning(|url| Err(SurfaceError::StyleLoad {
                url: url.to_string(),
                reason: "404".to_string(),
            }));

        let provider = MapToolProvider::new(surface).unwrap();
        let outcome = provider
            .execute("set_map_style", &json!({"styleUrl": "mapbox://styles/missing"}))
            .await;

        assert!(outcome.is_success());
        provider.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_adapter_panic_is_contained() {
        let mut surface = MockSurface::new();
        surface
            .expect_camera()
            .returning(|| panic!("renderer crashed"));
        surface
            .expect_move_camera()
            .returning(|_, _| Ok(()));

        let provider = MapToolProvider::with_config(surface, &await_config()).unwrap();
        let outcome = provider
            .execute("pan_map_to_location", &json!({"latitude": 1, "longitude": 2}))
            .await;
        assert_eq!(outcome.code(), Some(ErrorCode::ExecutionError));
        assert!(outcome.content().contains("renderer crashed"));

        // The worker survives and keeps serving
        let outcome = provider
            .execute("pan_map_to_location", &json!({"latitude": 1, "longitude": 2, "zoom": 3}))
            .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_await_mode_reports_applied_message() {
        let surface = MemorySurface::new();
        let provider = MapToolProvider::with_config(surface.clone(), &await_config()).unwrap();

        provider
            .execute("add_polygon_to_map", &json!({"coordinates": [[0, 0], [1, 0], [1, 1]], "layerName": "zone"}))
            .await;
        let outcome = provider
            .execute("clear_map_layers", &json!({"layerNames": ["zone", "ghost"]}))
            .await;

        assert_eq!(
            outcome,
            ToolOutcome::success("Cleared 1 of 2 requested layer(s)")
        );
        assert!(surface.snapshot().groups.is_empty());
    }

    #[test]
    fn test_blocking_use() {
        let (provider, surface) = provider();

        tokio_test::block_on(async {
            let outcome = provider
                .execute("set_map_style", &json!({"styleUrl": "mapbox://styles/mapbox/light-v11"}))
                .await;
            assert_eq!(
                outcome,
                ToolOutcome::success("Map style set to mapbox://styles/mapbox/light-v11")
            );
            provider.flush().await.unwrap();
        });

        assert_eq!(
            surface.snapshot().style.as_deref(),
            Some("mapbox://styles/mapbox/light-v11")
        );
    }

    #[test]
    fn test_tool_call_wire_form() {
        let call: ToolCall =
            serde_json::from_value(json!({"name": "clear_map_layers", "arguments": {"layerNames": ["a"]}}))
                .unwrap();
        assert_eq!(call.params, json!({"layerNames": ["a"]}));

        let call: ToolCall = serde_json::from_value(json!({"name": "clear_map_layers"})).unwrap();
        assert_eq!(call.params, Value::Null);
    }
}
