use glam::Vec3;
use voxel_lattice::camera::{Camera, DEFAULT_SENSITIVITY, PITCH_LIMIT_DEGREES};

fn assert_close(a: Vec3, b: Vec3, tolerance: f32, what: &str) {
    assert!(
        (a - b).length() < tolerance,
        "{}: expected {:?}, got {:?}",
        what,
        b,
        a
    );
}

#[cfg(test)]
mod direction_tests {
    use super::*;

    #[test]
    fn test_default_camera_faces_positive_z() {
        let camera = Camera::new();
        assert_eq!(camera.yaw, 90.0);
        assert_eq!(camera.pitch, 0.0);
        assert_close(camera.front(), Vec3::Z, 1e-6, "Yaw 90 with no pitch looks down +Z");
    }

    #[test]
    fn test_yaw_zero_faces_positive_x() {
        let mut camera = Camera::new();
        camera.yaw = 0.0;
        assert_close(camera.front(), Vec3::X, 1e-6, "Yaw 0 looks down +X");
    }

    #[test]
    fn test_pitch_tilts_the_front_vector() {
        let mut camera = Camera::new();
        camera.pitch = 45.0;

        let front = camera.front();
        assert!(
            (front.y - 45.0_f32.to_radians().sin()).abs() < 1e-6,
            "front.y should be sin(pitch)"
        );
        assert!(front.z > 0.0, "Yaw 90 keeps a +Z component while pitched");
    }

    #[test]
    fn test_front_is_always_unit_length() {
        let mut camera = Camera::new();
        for yaw in [-180.0, -90.0, 0.0, 37.5, 90.0, 271.0] {
            for pitch in [-89.0, -45.0, 0.0, 30.0, 89.0] {
                camera.yaw = yaw;
                camera.pitch = pitch;
                let len = camera.front().length();
                assert!(
                    (len - 1.0).abs() < 1e-5,
                    "front must stay unit length at yaw {} pitch {}, got {}",
                    yaw,
                    pitch,
                    len
                );
            }
        }
    }

    #[test]
    fn test_right_is_horizontal_and_orthogonal() {
        let mut camera = Camera::new();
        camera.yaw = 37.0;
        camera.pitch = -25.0;

        let right = camera.right();
        assert_eq!(right.y, 0.0, "right stays in the horizontal plane");
        assert!(
            camera.front().dot(right).abs() < 1e-6,
            "right is orthogonal to front"
        );
    }
}

#[cfg(test)]
mod mouse_tests {
    use super::*;

    #[test]
    fn test_pitch_clamps_at_the_limit() {
        let mut camera = Camera::new();

        camera.process_mouse(0.0, -100000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT_DEGREES, "Looking far up stops at +89");

        camera.process_mouse(0.0, 100000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT_DEGREES, "Looking far down stops at -89");
    }

    #[test]
    fn test_moving_the_mouse_up_looks_up() {
        let mut camera = Camera::new();
        // Screen-space dy is positive downward
        camera.process_mouse(0.0, -20.0);
        assert_eq!(camera.pitch, 20.0 * DEFAULT_SENSITIVITY);
    }

    #[test]
    fn test_yaw_accumulates_without_clamping() {
        let mut camera = Camera::new();
        camera.process_mouse(10000.0, 0.0);
        assert_eq!(camera.yaw, 90.0 + 10000.0 * DEFAULT_SENSITIVITY);
    }

    #[test]
    fn test_sensitivity_scales_mouse_input() {
        let mut camera = Camera::new();
        camera.sensitivity = 0.5;
        camera.process_mouse(10.0, 0.0);
        assert_eq!(camera.yaw, 95.0);
    }
}

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[test]
    fn test_forward_moves_along_front() {
        let mut camera = Camera::new();
        let start = camera.position;
        let front = camera.front();

        camera.movement.forward = true;
        camera.update(2.0);

        assert_close(
            camera.position,
            start + front * 2.0,
            1e-5,
            "One forward key for 2s at speed 1",
        );
    }

    #[test]
    fn test_strafe_moves_along_right() {
        let mut camera = Camera::new();
        let start = camera.position;
        let right = camera.right();

        camera.movement.right = true;
        camera.update(0.5);

        assert_close(
            camera.position,
            start + right * 0.5,
            1e-5,
            "Strafing right for 0.5s at speed 1",
        );
    }

    #[test]
    fn test_vertical_movement_uses_the_world_axis() {
        let mut camera = Camera::new();
        camera.pitch = 45.0;
        let start = camera.position;

        camera.movement.up = true;
        camera.update(1.0);

        assert_eq!(camera.position.x, start.x, "Vertical movement never drifts in X");
        assert_eq!(camera.position.z, start.z, "Vertical movement never drifts in Z");
        assert!((camera.position.y - (start.y + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut camera = Camera::new();
        let start = camera.position;

        camera.movement.forward = true;
        camera.movement.backward = true;
        camera.update(1.0);

        assert_eq!(camera.position, start, "W and S together go nowhere");
    }

    #[test]
    fn test_boost_doubles_the_displacement() {
        let mut plain = Camera::new();
        plain.movement.forward = true;
        plain.update(1.0);
        let plain_disp = plain.position - Camera::new().position;

        let mut boosted = Camera::new();
        boosted.movement.forward = true;
        boosted.movement.boost = true;
        boosted.update(1.0);
        let boosted_disp = boosted.position - Camera::new().position;

        assert_close(boosted_disp, plain_disp * 2.0, 1e-6, "Shift doubles speed");
    }

    #[test]
    fn test_speed_scales_displacement() {
        let mut camera = Camera::new();
        camera.speed = 4.0;
        let start = camera.position;
        let front = camera.front();

        camera.movement.forward = true;
        camera.update(0.25);

        assert_close(camera.position, start + front, 1e-5, "speed 4 for 0.25s moves 1 unit");
    }

    #[test]
    fn test_identical_input_sequences_land_identically() {
        let run = || {
            let mut camera = Camera::new();
            camera.movement.forward = true;
            camera.update(0.016);
            camera.process_mouse(12.0, -7.0);
            camera.update(0.016);
            camera.movement.forward = false;
            camera.movement.left = true;
            camera.movement.boost = true;
            camera.update(0.032);
            camera.position
        };

        assert_eq!(run(), run(), "Same keys, deltas and mouse input, same position");
    }
}

#[cfg(test)]
mod matrix_tests {
    use super::*;

    #[test]
    fn test_view_matrix_maps_the_camera_to_the_origin() {
        let mut camera = Camera::new();
        camera.position = Vec3::new(3.0, -2.0, 7.5);
        camera.yaw = 123.0;
        camera.pitch = -15.0;

        let eye_in_view = camera.view_matrix().transform_point3(camera.position);
        assert!(
            eye_in_view.length() < 1e-4,
            "The camera position is the view-space origin, got {:?}",
            eye_in_view
        );
    }

    #[test]
    fn test_look_direction_projects_to_screen_center() {
        let camera = Camera::new();
        let ahead = camera.position + camera.front() * 10.0;

        let ndc = camera.view_projection(1.0).project_point3(ahead);
        assert!(ndc.x.abs() < 1e-4, "Straight ahead lands on the horizontal center");
        assert!(ndc.y.abs() < 1e-4, "Straight ahead lands on the vertical center");
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "10 units ahead is inside [near, far]");
    }

    #[test]
    fn test_projection_uses_fov_and_aspect() {
        let camera = Camera::new();
        let proj = camera.projection_matrix(2.0);

        let focal = 1.0 / (30.0_f32.to_radians()).tan();
        assert!((proj.y_axis.y - focal).abs() < 1e-4, "60 degree vertical FOV");
        assert!((proj.x_axis.x - focal / 2.0).abs() < 1e-4, "Aspect divides X");
    }
}
