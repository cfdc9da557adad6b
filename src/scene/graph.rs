use crate::foundation::core::{Rgb8, Transform3D, Vec3};

/// Handle to a renderable node. Ids are minted by [`SceneGraph::spawn`] and
/// nodes are never removed, so a handle stays valid for the scene's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Renderer-facing seam: the core only ever spawns nodes and mutates their
/// transforms plus a global background color. Real renderers implement this
/// over their scene graph; [`MemoryScene`] backs headless runs and tests.
///
/// Node accessors take a [`NodeId`] minted by [`spawn`](Self::spawn) on the
/// same scene. Implementations may panic when handed a hand-built id or one
/// from a different scene.
pub trait SceneGraph {
    /// Create a node with the given transform and return its handle.
    fn spawn(&mut self, transform: Transform3D) -> NodeId;

    /// Current world-space position of a node.
    fn position(&self, node: NodeId) -> Vec3;
    /// Write a node's world-space position.
    fn set_position(&mut self, node: NodeId, position: Vec3);

    /// Current per-axis scale of a node.
    fn scale(&self, node: NodeId) -> Vec3;
    /// Write a node's per-axis scale.
    fn set_scale(&mut self, node: NodeId, scale: Vec3);

    /// Scene-wide background color.
    fn background(&self) -> Rgb8;
    /// Write the scene-wide background color.
    fn set_background(&mut self, color: Rgb8);
}

/// Plain vector-backed [`SceneGraph`] for headless simulation and tests.
#[derive(Clone, Debug)]
pub struct MemoryScene {
    nodes: Vec<Transform3D>,
    background: Rgb8,
}

impl MemoryScene {
    /// Empty scene with a black background.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            background: Rgb8::new(0, 0, 0),
        }
    }

    /// Number of nodes spawned so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Full transform of a node. Panics on ids this scene did not mint.
    pub fn transform(&self, node: NodeId) -> Transform3D {
        self.nodes[node.0]
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for MemoryScene {
    fn spawn(&mut self, transform: Transform3D) -> NodeId {
        self.nodes.push(transform);
        NodeId(self.nodes.len() - 1)
    }

    fn position(&self, node: NodeId) -> Vec3 {
        self.nodes[node.0].translate
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        self.nodes[node.0].translate = position;
    }

    fn scale(&self, node: NodeId) -> Vec3 {
        self.nodes[node.0].scale
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) {
        self.nodes[node.0].scale = scale;
    }

    fn background(&self) -> Rgb8 {
        self.background
    }

    fn set_background(&mut self, color: Rgb8) {
        self.background = color;
    }
}
