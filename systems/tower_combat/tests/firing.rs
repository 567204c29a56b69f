use fantasy_td_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, Faction, GameConfig, TowerKind, WaveId,
};
use fantasy_td_system_tower_combat::TowerCombat;
use fantasy_td_system_tower_targeting::TowerTargeting;
use fantasy_td_world::{
    self as world,
    enemies::{Enemy, Placement},
    projectiles::ProjectileTarget,
    World,
};
use glam::Vec2;

fn add_enemy(world: &mut World, position: Vec2) -> EnemyId {
    let id = world.ids.enemy();
    world.enemies.push(Enemy {
        id,
        wave: WaveId::new(0),
        kind: EnemyKind::Skirmisher,
        faction: Faction::Humans,
        hp: 30.0,
        max_hp: 30.0,
        speed: 1.0,
        size_scale: 1.0,
        is_boss: false,
        target_waypoint: 1,
        placement: Placement::Positioned {
            position,
            velocity: Vec2::X,
        },
        knockback_remaining: 0.0,
        knockback_resist_remaining: 0.0,
        reached_end: false,
    });
    id
}

fn place(world: &mut World, cell: CellCoord, kind: TowerKind) {
    let mut events = Vec::new();
    world::apply(world, Command::PlaceTower { cell, kind }, &mut events);
    assert!(matches!(events.as_slice(), [Event::TowerPlaced { .. }]));
}

#[test]
fn every_ready_tower_fires_at_its_own_nearest_enemy() {
    let mut world = World::new(GameConfig::default());
    place(&mut world, CellCoord::new(3, 3), TowerKind::Mage);
    place(&mut world, CellCoord::new(8, 3), TowerKind::Archer);
    let west = add_enemy(&mut world, Vec2::new(224.0, 288.0));
    let east = add_enemy(&mut world, Vec2::new(544.0, 160.0));

    let mut targeting = TowerTargeting::new();
    let mut combat = TowerCombat::new();
    let mut targets = Vec::new();
    let mut events = Vec::new();

    targeting.handle(&world, &mut targets);
    combat.handle(&mut world, 0.05, &targets, &mut events);

    let aimed: Vec<_> = world
        .projectiles
        .iter()
        .map(|projectile| projectile.target)
        .collect();
    assert_eq!(
        aimed,
        vec![ProjectileTarget::Homing(west), ProjectileTarget::Homing(east)]
    );
    assert_eq!(events.len(), 2);

    events.clear();
    targeting.handle(&world, &mut targets);
    combat.handle(&mut world, 0.05, &targets, &mut events);
    assert!(events.is_empty(), "both towers are cooling down");
}
