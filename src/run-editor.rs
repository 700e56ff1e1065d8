use std::{task::Poll, time::Duration};

use bevy::{
    log::LogPlugin,
    prelude::*,
    tasks::futures_lite::future,
};
use hex_map_editor::{
    plugins::hex_map::pump_loads,
    prelude::*,
    Plane,
};

const FRAME: Duration = Duration::from_millis(16);
const SCRIPT_FRAMES: u32 = 16;
const SETTLE_FRAMES: u32 = 120;

/// A placed prop standing in for real scene content.
#[derive(Debug)]
struct Prop {
    id: u64,
    asset: String,
    position: Vec3,
}

/// Pretends to load props: each load is built on the async compute pool and held back a
/// few frames; assets ending in `.missing` fail.
#[derive(Default)]
struct PropSpawner {
    next: u64,
}

impl Instantiate for PropSpawner {
    type Asset = String;
    type Representation = Prop;
    type Error = String;

    fn is_resolvable(&self, asset: &String) -> bool {
        !asset.is_empty()
    }

    fn instantiate(&mut self, asset: &String, position: Vec3) -> LoadTask<Prop, String> {
        let id = self.next;
        self.next += 1;
        let asset = asset.clone();
        let build = spawn_load(async move {
            if asset.ends_with(".missing") {
                return Err(format!("{asset} not found"));
            }
            Ok(Prop { id, asset, position })
        });
        // the manager polls once a frame, so each pending poll holds the load back one frame
        let mut frames = 2 + id % 3;
        Box::pin(async move {
            future::poll_fn(|_| match frames {
                0 => Poll::Ready(()),
                _ => {
                    frames -= 1;
                    Poll::Pending
                }
            }).await;
            build.await
        })
    }

    fn release(&mut self, prop: Prop) {
        info!("released prop {} ({}) at {}", prop.id, prop.asset, prop.position);
    }
}

enum Step {
    Pointer(PointerInput),
    Command(EditorCommand<String>),
}

fn assign(coord: Axial, content_id: &str, asset: &str) -> Step {
    Step::Command(EditorCommand::Assign {
        coord,
        content_id: content_id.to_owned(),
        label: content_id.to_uppercase(),
        asset: asset.to_owned(),
    })
}

fn pointer(plane: &Plane, coord: Axial, kind: PointerKind) -> Step {
    Step::Pointer(PointerInput { point: plane.hex_to_point(coord), kind })
}

/// A short editing session: place, replace mid-load, fail a load, select and deselect.
fn session(plane: &Plane) -> Vec<(u32, Step)> {
    let origin = Axial::new(0., 0.);
    let east = Axial::new(1., -1.);
    let west = Axial::new(-2., 1.);
    vec![
        (0, pointer(plane, origin, PointerKind::Move)),
        (0, pointer(plane, origin, PointerKind::PrimaryDown)),
        (1, assign(origin, "tree", "props/tree")),
        (2, assign(origin, "rock", "props/rock")),
        (3, assign(east, "bush", "props/bush")),
        (3, assign(west, "lantern", "props/lantern.missing")),
        (5, pointer(plane, east, PointerKind::Move)),
        (5, pointer(plane, east, PointerKind::PrimaryDown)),
        (8, pointer(plane, east, PointerKind::PrimaryDown)),
        (10, Step::Command(EditorCommand::Clear { coord: east })),
        (12, Step::Command(EditorCommand::SetPreview { coord: origin, show: false })),
        (13, assign(east, "bush", "props/bush")),
    ]
}

fn report_loads(mut reader: MessageReader<LoadEvent>) {
    for event in reader.read() {
        match event {
            LoadEvent::Instantiated { coord, content_id } => info!("{content_id} is now on {coord}"),
            LoadEvent::Failed(e) => warn!("{e}"),
            LoadEvent::Discarded { coord, content_id } => debug!("dropped stale {content_id} load for {coord}"),
        }
    }
}

fn report_selection(
    mut reader: MessageReader<SelectionChanged>,
    map: Res<HexMap<PropSpawner>>,
) {
    for &SelectionChanged { selected } in reader.read() {
        let Some(coord) = selected else {
            info!("selected cell: none");
            continue;
        };
        match map.get(coord) {
            Some(cell) => info!("selected cell: {coord}, content: {}", cell.label),
            None => info!("selected cell: {coord}, content: empty"),
        }
    }
}

fn run_until_settled(app: &mut App) {
    for _ in 0..SETTLE_FRAMES {
        if app.world().resource::<HexMap<PropSpawner>>().is_settled() { return }
        app.update();
        std::thread::sleep(FRAME);
    }
    warn!("loads still in flight after {SETTLE_FRAMES} frames");
}

fn main() -> Result<(), EditorError> {
    let config = GridConfig::default();
    let map = HexMap(ContentLifecycleManager::new(&config, PropSpawner::default())?);
    let plane = *map.plane();

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        LogPlugin {
            level: bevy::log::Level::DEBUG,
            filter:  "wgpu=error,bevy=warn,".to_owned()
                    +"hex_map_editor=debug,"
                    +"editor=info",
            ..default()
        },
        HexMapPlugin::<PropSpawner>::default(),
    ));
    app.insert_resource(config)
        .insert_resource(map)
        .add_systems(Update, (report_loads, report_selection).after(pump_loads::<PropSpawner>));
    app.finish();
    app.cleanup();

    let script = session(&plane);
    for frame in 0..SCRIPT_FRAMES {
        for (_, step) in script.iter().filter(|(at, _)| *at == frame) {
            match step {
                Step::Pointer(input) => { app.world_mut().write_message(*input); }
                Step::Command(command) => { app.world_mut().write_message(command.clone()); }
            }
        }
        app.update();
        std::thread::sleep(FRAME);
    }
    run_until_settled(&mut app);

    let map = app.world().resource::<HexMap<PropSpawner>>();
    let mut previews: Vec<_> = map.previews().collect();
    previews.sort_by_key(|preview| preview.coord);
    for preview in previews {
        info!("preview {} {} (realized: {})", preview.coord, preview.label, preview.has_content);
    }

    let path = std::env::temp_dir().join("hex-map-editor-session.map");
    map.capture().write(&path)?;
    info!("saved {} cells to {}", map.store().len(), path.display());

    let restored = MapData::<String>::read(&path)?;
    let count = app.world_mut().resource_mut::<HexMap<PropSpawner>>().restore(restored)?;
    info!("restored {count} cells, reloading");
    run_until_settled(&mut app);

    Ok(())
}
