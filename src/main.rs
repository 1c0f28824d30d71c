// IntSar-3D math demo: builds a small parent/child pose chain and logs it

use std::f32::consts::FRAC_PI_2;

use intsar_math::{quaternion, EulerAngles, Quaternion, Transform, Vector3};

fn main() {
    // Initialize logging
    env_logger::init();

    let body = Transform::from_euler(
        Vector3::new(0.0, 0.0, 10.0),
        &EulerAngles::new(FRAC_PI_2, 0.0, 0.0),
        Vector3::ONE,
    );
    let arm = Transform::new(
        Vector3::new(1.0, 0.5, 0.0),
        Quaternion::about_x(0.25),
        Vector3::new(1.0, 2.0, 1.0),
    );

    let body_world = body.matrix();
    let arm_world = arm.world_matrix(&body_world);
    log::info!("arm origin in world space: {:?}", arm_world.transform_point(Vector3::ZERO));

    let mut orientation = EulerAngles::from_object_to_world_matrix(&body_world);
    orientation.canonize();
    log::info!("body orientation: {orientation:?}");

    let start = Quaternion::IDENTITY;
    let end = body.rotation;
    for step in 0..=4 {
        let t = step as f32 / 4.0;
        let q = quaternion::slerp(&start, &end, t);
        log::info!("t = {t:.2}: rotated by {:.3} rad", q.rotation_angle());
    }

    match arm_world.inverse() {
        Ok(inverse) => log::info!(
            "world origin in arm space: {:?}",
            inverse.transform_point(Vector3::ZERO)
        ),
        Err(err) => log::error!("arm transform is not invertible: {err}"),
    }
}
