use std::{collections::VecDeque, fmt};

use crate::{arena::Handle, Hook, Tree};

impl<K: fmt::Display, H: Hook> Tree<K, H> {
    /// Writes a graphviz rendering of the tree to `w`, one row per level.
    ///
    /// Nodes are labelled `key:height`, with `/size` appended on size-tracking trees. Missing
    /// children are drawn as points.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, mut w: W) -> fmt::Result {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(Handle),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let handle = match queue.pop_front() {
                    Some(Item::Node(handle)) => handle,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                // Keys may repeat, so nodes are identified by handle.
                let id = handle.to_index();
                let node = self.node(handle);
                let height = node.stats.height;
                write!(w, "\"graph{name}-{id}\" [label=\"{}:{height}", node.key)?;
                if H::TRACKS_SIZE {
                    write!(w, "/{}", node.stats.size)?;
                }
                write!(w, "\"]; ")?;

                for child in [node.left(), node.right()] {
                    match child {
                        Some(child) => {
                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{id}\" -> \"graph{name}-{}\";",
                                child.to_index()
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{id}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}
