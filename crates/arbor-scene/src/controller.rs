//! Single-asset scene controller
//!
//! Owns the displayed plant model and runs asset transitions one at a time:
//! fade the overlay in, drop the old model, fetch and place the new one,
//! restore the camera, fade the overlay out, then answer the requester.
//! Requests arrive from outside the ECS through [`TransitionQueue`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use arbor_core::camera::OrbitController;
use arbor_core::framing::{AssetFraming, Bounds};
use arbor_core::pipeline::AssetTransition;
use arbor_core::transition::{AssetLoadError, TransitionDriver, TransitionEvent};
use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use futures::channel::oneshot;

use crate::camera::MainCamera;
use crate::{from_core, to_core, SceneSettings};

/// Frames to wait for a spawned scene to produce meshes before framing it anyway
const MAX_PLACEMENT_FRAMES: u32 = 30;

type LoadReply = oneshot::Sender<Result<(), AssetLoadError>>;

/// A request to show a different asset
#[derive(Debug)]
pub struct TransitionRequest {
    pub path: String,
    pub reply: Option<LoadReply>,
}

/// Requests waiting for the controller, shared with async callers
#[derive(Resource, Clone, Default)]
pub struct TransitionQueue(pub Arc<Mutex<VecDeque<TransitionRequest>>>);

impl TransitionQueue {
    pub fn push(&self, request: TransitionRequest) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push_back(request);
        }
    }

    fn pop(&self) -> Option<TransitionRequest> {
        self.0.lock().ok().and_then(|mut queue| queue.pop_front())
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Async handle given to the prediction pipeline
#[derive(Clone, Default)]
pub struct SceneHandle {
    queue: TransitionQueue,
}

impl SceneHandle {
    pub fn new(queue: TransitionQueue) -> Self {
        Self { queue }
    }

    /// Queue a transition and return the receiver for its completion
    pub fn request(&self, path: &str) -> oneshot::Receiver<Result<(), AssetLoadError>> {
        let (tx, rx) = oneshot::channel();
        self.queue.push(TransitionRequest {
            path: path.to_string(),
            reply: Some(tx),
        });
        rx
    }
}

impl AssetTransition for SceneHandle {
    async fn load_asset(&self, path: &str) -> Result<(), AssetLoadError> {
        self.request(path)
            .await
            .unwrap_or(Err(AssetLoadError::Dropped))
    }
}

/// Model spawned but not yet measured
#[derive(Debug, Clone, Copy)]
struct Placement {
    entity: Entity,
    frames: u32,
    mesh_count: usize,
}

/// Marker for the root of the displayed model
#[derive(Component)]
pub struct DisplayedAsset;

#[derive(Resource)]
pub struct SceneController {
    pub driver: TransitionDriver,
    pub orbit: OrbitController,
    current_asset: Option<Entity>,
    loading: Option<(String, Handle<Gltf>)>,
    placing: Option<Placement>,
    camera_snapshot: Option<Transform>,
    reply: Option<LoadReply>,
}

impl SceneController {
    pub fn new(fade_ms: f64) -> Self {
        Self {
            driver: TransitionDriver::new(fade_ms),
            orbit: OrbitController::default(),
            current_asset: None,
            loading: None,
            placing: None,
            camera_snapshot: None,
            reply: None,
        }
    }

    fn fail(&mut self, error: AssetLoadError, now_ms: f64) {
        tracing::error!("{}", error);
        self.loading = None;
        self.placing = None;
        self.driver.asset_failed(error, now_ms);
    }
}

pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_controller).add_systems(
            Update,
            (
                start_next_transition,
                drive_transition,
                poll_asset_load,
                place_asset,
            )
                .chain(),
        );
    }
}

fn now_ms(time: &Time) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

fn setup_controller(mut commands: Commands, settings: Res<SceneSettings>, queue: Res<TransitionQueue>) {
    commands.insert_resource(SceneController::new(settings.fade_ms));

    tracing::info!("Queueing initial asset {}", settings.initial_asset);
    queue.push(TransitionRequest {
        path: settings.initial_asset.clone(),
        reply: None,
    });
}

/// Start the oldest queued request once the previous transition is over
fn start_next_transition(
    mut controller: ResMut<SceneController>,
    queue: Res<TransitionQueue>,
    time: Res<Time>,
) {
    if controller.driver.is_busy() {
        return;
    }
    let Some(request) = queue.pop() else {
        return;
    };

    match controller.driver.begin(request.path.as_str(), now_ms(&time)) {
        Ok(()) => {
            tracing::info!("Transition to {}", request.path);
            controller.reply = request.reply;
        }
        Err(e) => {
            tracing::warn!("{}", e);
            if let Some(reply) = request.reply {
                let _ = reply.send(Err(AssetLoadError::Busy));
            }
        }
    }
}

/// Advance the overlay and act on swap/finish points
fn drive_transition(
    mut commands: Commands,
    mut controller: ResMut<SceneController>,
    asset_server: Res<AssetServer>,
    camera: Query<&Transform, With<MainCamera>>,
    time: Res<Time>,
) {
    let Some(event) = controller.driver.tick(now_ms(&time)) else {
        return;
    };

    match event {
        TransitionEvent::Swap { path } => {
            controller.camera_snapshot = camera.single().ok().copied();

            if let Some(entity) = controller.current_asset.take() {
                commands.entity(entity).despawn();
            }

            tracing::debug!("Fetching {}", path);
            let handle: Handle<Gltf> = asset_server.load(path.clone());
            controller.loading = Some((path, handle));
        }
        TransitionEvent::Finished { path, result } => {
            match &result {
                Ok(()) => tracing::info!("Now showing {}", path),
                Err(e) => tracing::warn!("Transition to {} ended without an asset: {}", path, e),
            }
            if let Some(reply) = controller.reply.take() {
                // The requester may have gone away
                let _ = reply.send(result);
            }
        }
    }
}

/// Spawn the model once its glTF has loaded
fn poll_asset_load(
    mut commands: Commands,
    mut controller: ResMut<SceneController>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    time: Res<Time>,
) {
    let Some((path, handle)) = controller.loading.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let scene = gltf_assets
                .get(&handle)
                .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));
            let Some(scene) = scene else {
                controller.fail(
                    AssetLoadError::Fetch {
                        path,
                        reason: "glTF contains no scenes".to_string(),
                    },
                    now_ms(&time),
                );
                return;
            };

            // Hidden at the origin until it has been measured
            let entity = commands
                .spawn((
                    SceneRoot(scene),
                    Transform::IDENTITY,
                    Visibility::Hidden,
                    DisplayedAsset,
                ))
                .id();
            controller.loading = None;
            controller.current_asset = Some(entity);
            controller.placing = Some(Placement {
                entity,
                frames: 0,
                mesh_count: 0,
            });
        }
        Some(LoadState::Failed(err)) => {
            controller.fail(
                AssetLoadError::Fetch {
                    path,
                    reason: err.to_string(),
                },
                now_ms(&time),
            );
        }
        _ => {}
    }
}

/// Measure the spawned model, centre it on the ground and retarget the orbit
pub(crate) fn place_asset(
    mut controller: ResMut<SceneController>,
    mut assets: Query<(&mut Transform, &mut Visibility), (With<DisplayedAsset>, Without<MainCamera>)>,
    mut camera: Query<&mut Transform, With<MainCamera>>,
    children: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Res<Assets<Mesh>>,
    time: Res<Time>,
) {
    let Some(mut placement) = controller.placing else {
        return;
    };
    placement.frames += 1;

    let mesh_entities: Vec<Entity> = children
        .iter_descendants(placement.entity)
        .filter(|e| mesh_query.contains(*e))
        .collect();

    // Scene spawning and transform propagation lag a frame behind; wait until
    // the mesh set stops growing
    let settled = !mesh_entities.is_empty() && mesh_entities.len() == placement.mesh_count;
    if !settled && placement.frames < MAX_PLACEMENT_FRAMES {
        placement.mesh_count = mesh_entities.len();
        controller.placing = Some(placement);
        return;
    }
    controller.placing = None;

    let mut bounds = Bounds::EMPTY;
    for (mesh, global) in mesh_entities.iter().filter_map(|e| mesh_query.get(*e).ok()) {
        let Some(local) = meshes.get(&mesh.0).and_then(mesh_bounds) else {
            continue;
        };
        for corner in local.corners() {
            bounds.extend(to_core(global.transform_point(from_core(corner))));
        }
    }

    let framing = AssetFraming::from_bounds(&bounds);
    tracing::debug!(
        size = ?bounds.size(),
        translation = ?framing.translation,
        min_distance = framing.min_distance,
        max_distance = framing.max_distance,
        "Framing asset"
    );

    if let Ok((mut transform, mut visibility)) = assets.get_mut(placement.entity) {
        transform.translation = from_core(framing.translation);
        *visibility = Visibility::Inherited;
    }

    controller.orbit.apply_framing(&framing);
    if let (Some(snapshot), Ok(mut transform)) = (controller.camera_snapshot.take(), camera.single_mut()) {
        *transform = snapshot;
    }

    controller.driver.asset_ready(now_ms(&time));
}

/// Local-space bounds of a mesh's vertex positions
fn mesh_bounds(mesh: &Mesh) -> Option<Bounds> {
    let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION)?.as_float3()?;
    let bounds = Bounds::from_points(positions.iter().map(|p| glam::Vec3::from_array(*p)));
    (!bounds.is_empty()).then_some(bounds)
}
