use crate::arena::TreeArena;
use crate::path;
use crate::value;
use core_types::NodeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Attribute key written by [`Memento::create_child_with_id`].
pub const ID_KEY: &str = "id";

/// Handle to one node of a memento tree.
///
/// A `Memento` is an alias, not an owner of a subtree: cloning it, or getting
/// one back from a navigation call, yields another view of the same storage.
/// Changes made through any handle are visible through every other handle
/// to the same tree.
///
/// Trees are confined to one thread (`Memento` is neither `Send` nor `Sync`).
/// No method hands out a borrow of the shared storage, so handles can be used
/// freely inside each other's calls.
///
/// # Example
///
/// ```
/// use memento::Memento;
///
/// let root = Memento::new_root("config");
/// root.put_integer("version", 2);
/// let user = root.create_child("user");
/// user.put_string("name", "ada");
///
/// assert_eq!(root.get_integer("version"), Some(2));
/// assert_eq!(root.child("user").unwrap().get_string("name").as_deref(), Some("ada"));
/// assert_eq!(user.parent(), Some(root));
/// ```
pub struct Memento {
    arena: Rc<RefCell<TreeArena>>,
    id: NodeId,
}

impl Memento {
    /// Create a fresh tree consisting of a single empty root.
    pub fn new_root(name: impl Into<String>) -> Self {
        let arena = Rc::new(RefCell::new(TreeArena::with_root(name.into())));
        arena.borrow_mut().retain(NodeId::ROOT);
        Self {
            arena,
            id: NodeId::ROOT,
        }
    }

    fn view(&self, id: NodeId) -> Memento {
        self.arena.borrow_mut().retain(id);
        Memento {
            arena: Rc::clone(&self.arena),
            id,
        }
    }

    /// Whether both handles refer to the same underlying node.
    pub fn same_node(&self, other: &Memento) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena) && self.id == other.id
    }

    pub fn name(&self) -> String {
        self.arena.borrow().node(self.id).name.clone()
    }

    // --- structure ---

    /// Append a new, empty child named `name` after any existing children.
    pub fn create_child(&self, name: &str) -> Memento {
        let id = self.arena.borrow_mut().add_child(self.id, name.to_string());
        log::trace!(target: "memento.tree", "created child {name} ({id:?})");
        self.view(id)
    }

    /// [`create_child`](Self::create_child), then tag the child with `id` under [`ID_KEY`].
    pub fn create_child_with_id(&self, name: &str, id: &str) -> Memento {
        let child = self.create_child(name);
        child.put_string(ID_KEY, id);
        child
    }

    /// The first child named `name`, created if there is none.
    pub fn create_child_smart(&self, name: &str) -> Memento {
        self.child(name).unwrap_or_else(|| self.create_child(name))
    }

    /// Deep-copy `source` (from this or any other tree) as a new last child.
    ///
    /// Copying an ancestor of `self` is allowed: the copy is taken before
    /// anything is inserted.
    pub fn copy_child(&self, source: &Memento) -> Memento {
        let nodes = source.arena.borrow().copy_out(source.id);
        let id = self
            .arena
            .borrow_mut()
            .paste(self.id, nodes)
            .expect("copied subtree always contains its root");
        self.view(id)
    }

    /// Unlink this node from its parent, making it the root of its own tree.
    ///
    /// Handles into the detached subtree remain valid. Once the last handle
    /// into a detached subtree is dropped, its storage is reused. Detaching a
    /// root does nothing.
    pub fn detach(&self) {
        self.arena.borrow_mut().detach(self.id);
    }

    // --- navigation ---

    pub fn parent(&self) -> Option<Memento> {
        let parent = self.arena.borrow().node(self.id).parent;
        parent.map(|id| self.view(id))
    }

    /// The top of the tree this node currently belongs to (`self` for a root).
    pub fn root(&self) -> Memento {
        let root = self.arena.borrow().root_of(self.id);
        self.view(root)
    }

    pub fn is_root(&self) -> bool {
        self.arena.borrow().node(self.id).parent.is_none()
    }

    /// The first direct child named `name`.
    pub fn child(&self, name: &str) -> Option<Memento> {
        let found = self.arena.borrow().first_child_named(self.id, name);
        found.map(|id| self.view(id))
    }

    /// Every direct child named `name`, in document order.
    pub fn children(&self, name: &str) -> Vec<Memento> {
        let ids = self.arena.borrow().children_named(self.id, name);
        ids.into_iter().map(|id| self.view(id)).collect()
    }

    pub fn all_children(&self) -> Vec<Memento> {
        let ids = self.arena.borrow().node(self.id).children.clone();
        ids.into_iter().map(|id| self.view(id)).collect()
    }

    /// Resolve a `/`-separated path of child names relative to this node.
    ///
    /// Each segment selects the first matching child. Empty segments are
    /// skipped, so an empty path resolves to `self`. See [`crate::path`].
    pub fn child_from_path(&self, path: &str) -> Option<Memento> {
        let arena = self.arena.borrow();
        let found = path::resolve_first(&arena, self.id, path);
        drop(arena);
        found.map(|id| self.view(id))
    }

    /// Like [`child_from_path`](Self::child_from_path), but the final
    /// segment selects every matching child.
    pub fn children_from_path(&self, path: &str) -> Vec<Memento> {
        let arena = self.arena.borrow();
        let found = path::resolve_all(&arena, self.id, path);
        drop(arena);
        found.into_iter().map(|id| self.view(id)).collect()
    }

    // --- attributes ---

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.arena
            .borrow()
            .node(self.id)
            .attribute(key)
            .map(str::to_string)
    }

    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.with_attribute(key, value::parse_boolean)
    }

    pub fn get_integer(&self, key: &str) -> Option<i32> {
        self.with_attribute(key, value::parse_integer)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.with_attribute(key, value::parse_double)
    }

    pub fn get_guid(&self, key: &str) -> Option<Uuid> {
        self.with_attribute(key, value::parse_guid)
    }

    /// The child's `id` attribute, as written by [`create_child_with_id`](Self::create_child_with_id).
    pub fn id(&self) -> Option<String> {
        self.get_string(ID_KEY)
    }

    fn with_attribute<T>(&self, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let arena = self.arena.borrow();
        arena.node(self.id).attribute(key).and_then(parse)
    }

    pub fn put_string(&self, key: &str, value: &str) {
        self.set_attribute(key, value.to_string());
    }

    pub fn put_boolean(&self, key: &str, value: bool) {
        self.set_attribute(key, value::format_boolean(value));
    }

    pub fn put_integer(&self, key: &str, value: i32) {
        self.set_attribute(key, value::format_integer(value));
    }

    pub fn put_double(&self, key: &str, value: f64) {
        self.set_attribute(key, value::format_double(value));
    }

    pub fn put_guid(&self, key: &str, value: Uuid) {
        self.set_attribute(key, value::format_guid(value));
    }

    fn set_attribute(&self, key: &str, value: String) {
        self.arena
            .borrow_mut()
            .node_mut(self.id)
            .set_attribute(key, value);
    }

    pub fn remove_attribute(&self, key: &str) -> Option<String> {
        self.arena.borrow_mut().node_mut(self.id).remove_attribute(key)
    }

    /// Attribute keys in insertion order.
    pub fn attribute_keys(&self) -> Vec<String> {
        let arena = self.arena.borrow();
        arena
            .node(self.id)
            .attributes
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Attribute key/value pairs in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.arena.borrow().node(self.id).attributes.clone()
    }

    // --- text ---

    pub fn text_data(&self) -> Option<String> {
        self.arena.borrow().node(self.id).text.clone()
    }

    pub fn put_text_data(&self, value: &str) {
        self.arena.borrow_mut().node_mut(self.id).text = Some(value.to_string());
    }
}

impl Clone for Memento {
    fn clone(&self) -> Self {
        self.view(self.id)
    }
}

impl Drop for Memento {
    fn drop(&mut self) {
        // The last handle takes the whole arena with it.
        if Rc::strong_count(&self.arena) == 1 {
            return;
        }
        if let Ok(mut arena) = self.arena.try_borrow_mut() {
            arena.release(self.id);
        }
    }
}

impl PartialEq for Memento {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

impl Eq for Memento {}

impl fmt::Debug for Memento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = self.arena.borrow();
        let node = arena.node(self.id);
        f.debug_struct("Memento")
            .field("id", &self.id)
            .field("name", &node.name)
            .field("attributes", &node.attributes.len())
            .field("children", &node.children.len())
            .finish()
    }
}
