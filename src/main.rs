use glam::Vec3;
use limb_rigger::{LimbRigger, MemoryScene, RigConfig, RigHierarchy, SceneBackend};

fn build_arm(scene: &mut MemoryScene) -> limb_rigger::Result<()> {
    scene.add_joint("joint1", None, Vec3::new(10.0, 140.0, 0.0))?;
    scene.add_joint("joint2", Some("joint1"), Vec3::new(40.0, 140.0, -6.0))?;
    scene.add_joint("joint3", Some("joint2"), Vec3::new(70.0, 140.0, 0.0))?;
    scene.select(&["joint1", "joint2", "joint3"]);
    Ok(())
}

fn print_tree(scene: &MemoryScene, node: &str, depth: usize) {
    println!("{}{}", "  ".repeat(depth), node);
    for child in scene.children_of(node) {
        print_tree(scene, child, depth + 1);
    }
}

fn print_blend(scene: &MemoryScene, rig: &RigHierarchy) -> limb_rigger::Result<()> {
    let state = rig.read_blend_state(scene)?;
    println!(
        "{} = {:.2}: fk visible {}, ik visible {}, end orient weights fk {:.2} / ik {:.2}",
        rig.blend_attribute,
        rig.blend(scene)?,
        state.fk_visible(),
        state.ik_visible(),
        state.fk_orient_weight,
        state.ik_orient_weight,
    );
    Ok(())
}

fn run() -> limb_rigger::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RigConfig::load(path)?,
        None => RigConfig::default(),
    };
    log::info!("config: {}", config.to_json()?);

    let mut scene = MemoryScene::new();
    build_arm(&mut scene)?;

    let mut rigger = LimbRigger::from_config(config)?;
    let chain = rigger.set_joints_from_selection(&scene)?;
    println!("Joints: {chain}");

    let rig = rigger.rig(&mut scene)?;
    print_tree(&scene, &rig.top_group, 0);
    println!("pole vector control at {}", scene.world_position(&rig.pole_vector.name)?);

    for value in [0.0, 0.5, 1.0] {
        rig.set_blend(&mut scene, value)?;
        print_blend(&scene, &rig)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
