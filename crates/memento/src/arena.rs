use core_types::NodeId;

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) text: Option<String>,
    pub(crate) parent: Option<NodeId>,
    /// Live `Memento` handles pointing at this slot.
    handles: usize,
    /// Live handles anywhere in the tree; only kept up to date on roots.
    tree_handles: usize,
}

impl NodeData {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            parent,
            handles: 0,
            tree_handles: 0,
        }
    }

    pub(crate) fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites in place so an existing key keeps its position.
    pub(crate) fn set_attribute(&mut self, key: &str, value: String) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub(crate) fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }
}

/// Owned copy of a subtree, flattened in preorder.
///
/// `parent` indexes into the same vector; the first entry is the subtree root
/// and has no parent.
#[derive(Debug)]
pub(crate) struct DetachedNode {
    pub(crate) parent: Option<usize>,
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) text: Option<String>,
}

/// Storage for every node of one tree and of the subtrees detached from it.
///
/// Forward links (`children`) are the only ownership edges; `parent` is a
/// plain index back into the same arena. Each root tracks how many handles
/// point into its tree. When that count drops to zero the whole tree is
/// unreachable and its slots go on the free list, so a `NodeId` is valid
/// exactly as long as some handle keeps its tree alive.
#[derive(Debug)]
pub(crate) struct TreeArena {
    nodes: Vec<NodeData>,
    free: Vec<NodeId>,
}

impl TreeArena {
    pub(crate) fn with_root(name: String) -> Self {
        Self {
            nodes: vec![NodeData::new(name, None)],
            free: Vec::new(),
        }
    }

    /// Slots in use, free ones included.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    fn push(&mut self, node: NodeData) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = node;
            return id;
        }
        let id = NodeId(
            u32::try_from(self.nodes.len()).expect("memento arena exceeds u32::MAX nodes"),
        );
        self.nodes.push(node);
        id
    }

    /// Record a new handle to `id`.
    pub(crate) fn retain(&mut self, id: NodeId) {
        self.node_mut(id).handles += 1;
        let root = self.root_of(id);
        self.node_mut(root).tree_handles += 1;
    }

    /// Forget a handle to `id`, reclaiming its tree if that was the last one.
    pub(crate) fn release(&mut self, id: NodeId) {
        self.node_mut(id).handles -= 1;
        let root = self.root_of(id);
        let data = self.node_mut(root);
        data.tree_handles -= 1;
        if data.tree_handles == 0 {
            self.free_tree(root);
        }
    }

    fn subtree_handles(&self, id: NodeId) -> usize {
        let mut total = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.node(next);
            total += node.handles;
            stack.extend_from_slice(&node.children);
        }
        total
    }

    fn free_tree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        let mut freed = 0usize;
        while let Some(id) = stack.pop() {
            let vacant = NodeData::new(String::new(), None);
            let node = std::mem::replace(&mut self.nodes[id.index()], vacant);
            stack.extend(node.children);
            self.free.push(id);
            freed += 1;
        }
        log::trace!(target: "memento.tree", "reclaimed {freed} unreachable nodes under {root:?}");
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, name: String) -> NodeId {
        let child = self.push(NodeData::new(name, Some(parent)));
        self.nodes[parent.index()].children.push(child);
        child
    }

    pub(crate) fn first_child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).name == name)
    }

    pub(crate) fn children_named(&self, parent: NodeId, name: &str) -> Vec<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .filter(|&child| self.node(child).name == name)
            .collect()
    }

    pub(crate) fn root_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.node(id).parent {
            id = parent;
        }
        id
    }

    /// Make `id` the root of its own tree.
    ///
    /// The handles inside the subtree move with it. If none are left on the
    /// old tree, the old tree is reclaimed.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node_mut(id).parent.take() else {
            return;
        };
        self.node_mut(parent).children.retain(|&child| child != id);

        let moved = self.subtree_handles(id);
        self.node_mut(id).tree_handles = moved;
        let old_root = self.root_of(parent);
        let data = self.node_mut(old_root);
        data.tree_handles -= moved;
        if data.tree_handles == 0 {
            self.free_tree(old_root);
        }
    }

    /// Snapshot the subtree at `id` without recursion.
    pub(crate) fn copy_out(&self, id: NodeId) -> Vec<DetachedNode> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, Option<usize>)> = vec![(id, None)];
        while let Some((node_id, parent)) = stack.pop() {
            let node = self.node(node_id);
            let index = out.len();
            out.push(DetachedNode {
                parent,
                name: node.name.clone(),
                attributes: node.attributes.clone(),
                text: node.text.clone(),
            });
            // Reverse so children are visited, and therefore appended, in order.
            for &child in node.children.iter().rev() {
                stack.push((child, Some(index)));
            }
        }
        out
    }

    /// Append a copied subtree under `parent`; returns the id of its root.
    pub(crate) fn paste(&mut self, parent: NodeId, nodes: Vec<DetachedNode>) -> Option<NodeId> {
        let mut ids: Vec<NodeId> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let attach_to = match node.parent {
                Some(index) => ids[index],
                None => parent,
            };
            let id = self.add_child(attach_to, node.name);
            let data = self.node_mut(id);
            data.attributes = node.attributes;
            data.text = node.text;
            ids.push(id);
        }
        ids.first().copied()
    }
}
