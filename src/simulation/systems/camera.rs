use bevy_ecs::prelude::*;

use crate::simulation::{Camera, CameraConfig, TickInput, Viewport};

/// Pans the board while the pointer rests on a viewport edge. The camera may
/// run an eighth of the map past the top-left and half of it the other way.
pub fn camera_system(
    input: Res<TickInput>,
    viewport: Res<Viewport>,
    config: Res<CameraConfig>,
    mut camera: ResMut<Camera>,
) {
    let pointer = input.pointer;
    let reach = config.edge_reaction;
    let speed = config.navigation_speed;
    let extent = camera.extent;

    // top
    if pointer.y - reach < 0.0 && camera.offset.y < extent.y / 8.0 {
        camera.offset.y += speed;
    }
    // bottom
    if pointer.y + reach > viewport.height && camera.offset.y > -extent.y / 2.0 {
        camera.offset.y -= speed;
    }
    // left
    if pointer.x - reach < 0.0 && camera.offset.x < extent.x / 8.0 {
        camera.offset.x += speed;
    }
    // right
    if pointer.x + reach > viewport.width && camera.offset.x > -extent.x / 2.0 {
        camera.offset.x -= speed;
    }
}
