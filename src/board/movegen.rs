/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use once_cell::unsync::OnceCell;
use tracing::debug;

use super::{Board, Diagonal, Move, MoveChain, Piece, PieceId, Position};

/// Index of a [`MoveNode`] within its [`MoveTree`].
pub type NodeId = usize;

/// One node of a [`MoveTree`].
///
/// The root stands for the piece's current square; every other node is a destination reached
/// by one step from its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveNode {
    position: Position,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    captured: Option<PieceId>,
}

impl MoveNode {
    /// The square this node stands for.
    #[inline(always)]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The node this step was made from, or `None` for the root.
    #[inline(always)]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Every continuation from this node.
    #[inline(always)]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The enemy piece jumped when stepping onto this node, if any.
    #[inline(always)]
    pub const fn captured(&self) -> Option<PieceId> {
        self.captured
    }

    /// Returns `true` if there is no way to continue from this node.
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Every way a single piece can move this turn, as a tree of [`MoveNode`]s.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]; the root is always node `0`.
/// A tree is a snapshot of one board and must be rebuilt after any piece moves.
#[derive(Debug)]
pub struct MoveTree {
    piece: PieceId,
    nodes: Vec<MoveNode>,
    chains: OnceCell<Vec<MoveChain>>,
}

impl MoveTree {
    /// Id of the root node.
    pub const ROOT: NodeId = 0;

    /// Explores every move available to the piece `id` on `board`.
    ///
    /// A captured piece yields an empty tree.
    ///
    /// # Example
    /// ```
    /// # use draughts::{Board, MoveTree, Position};
    /// let board = Board::default();
    /// let pos = Position::from_number(32, board.dims()).unwrap();
    /// let id = board.occupant(pos).unwrap();
    ///
    /// let tree = MoveTree::build(&board, id);
    /// let moves = tree.chains().iter().map(|c| c.to_string()).collect::<Vec<_>>();
    /// assert_eq!(moves, ["32-27", "32-28"]);
    /// ```
    pub fn build(board: &Board, id: PieceId) -> Self {
        let piece = board.piece(id);
        let nodes = match piece.position() {
            Some(origin) => TreeBuilder::new(board, piece, origin).build(),
            None => Vec::new(),
        };

        debug!(piece = %id, nodes = nodes.len(), "built move tree");

        Self {
            piece: id,
            nodes,
            chains: OnceCell::new(),
        }
    }

    /// The piece this tree was built for.
    #[inline(always)]
    pub const fn piece(&self) -> PieceId {
        self.piece
    }

    /// The root node, or `None` if the piece was captured.
    #[inline(always)]
    pub fn root(&self) -> Option<&MoveNode> {
        self.nodes.first()
    }

    /// Fetch the node `id`.
    ///
    /// # Panics
    ///
    /// If `id` does not belong to this tree.
    #[inline(always)]
    pub fn node(&self, id: NodeId) -> &MoveNode {
        &self.nodes[id]
    }

    /// All nodes of this tree, root first.
    #[inline(always)]
    pub fn nodes(&self) -> &[MoveNode] {
        &self.nodes
    }

    /// Number of nodes in this tree, including the root.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if this tree has no nodes at all, i.e. the piece was captured.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over the ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, |&node| self.nodes[node].parent)
    }

    /// The leaves of this tree, in depth-first order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        if self.nodes.is_empty() {
            return leaves;
        }

        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                leaves.push(id);
            }
            stack.extend(node.children.iter().rev());
        }

        leaves
    }

    /// Every complete chain this piece can make, one per leaf.
    ///
    /// A root without children yields a single chain without any steps.
    /// The chains are computed on first access and kept for the lifetime of the tree.
    pub fn chains(&self) -> &[MoveChain] {
        self.chains.get_or_init(|| {
            self.leaves()
                .into_iter()
                .map(|leaf| self.chain_to(leaf))
                .collect()
        })
    }

    /// Walks from `leaf` back to the root, collecting one step per edge.
    fn chain_to(&self, leaf: NodeId) -> MoveChain {
        let mut moves = Vec::new();
        let mut id = leaf;
        while let Some(parent) = self.nodes[id].parent {
            let node = &self.nodes[id];
            moves.push(Move {
                from: self.nodes[parent].position,
                to: node.position,
                captured: node.captured,
            });
            id = parent;
        }
        moves.reverse();

        MoveChain::new(self.piece, self.nodes[Self::ROOT].position, moves)
    }
}

/// Grows the node arena of a [`MoveTree`] from a piece's current square.
struct TreeBuilder<'a> {
    board: &'a Board,
    piece: &'a Piece,
    origin: Position,
    nodes: Vec<MoveNode>,
}

impl<'a> TreeBuilder<'a> {
    fn new(board: &'a Board, piece: &'a Piece, origin: Position) -> Self {
        let root = MoveNode {
            position: origin,
            parent: None,
            children: Vec::new(),
            captured: None,
        };

        Self {
            board,
            piece,
            origin,
            nodes: vec![root],
        }
    }

    fn build(mut self) -> Vec<MoveNode> {
        self.add_captures(MoveTree::ROOT);

        if self.piece.is_crowned() {
            self.add_king_steps();
        } else {
            self.add_man_steps();
        }

        self.nodes
    }

    /// The moving piece has been lifted off its origin, so that square counts as free.
    #[inline(always)]
    fn is_free(&self, position: Position) -> bool {
        position == self.origin || self.board.is_empty(position)
    }

    /// The enemy piece on `position`, if there is one.
    #[inline(always)]
    fn enemy_at(&self, position: Position) -> Option<PieceId> {
        self.board
            .occupant(position)
            .filter(|&id| self.board.piece(id).side() != self.piece.side())
    }

    /// Returns `true` if `victim` was already jumped on the way to `node`.
    fn has_captured(&self, node: NodeId, victim: PieceId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.nodes[id].captured == Some(victim) {
                return true;
            }
            current = self.nodes[id].parent;
        }
        false
    }

    fn add_node(&mut self, parent: NodeId, position: Position, captured: Option<PieceId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(MoveNode {
            position,
            parent: Some(parent),
            children: Vec::new(),
            captured,
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Adds every capture available from `node`, recursing into each landing square.
    fn add_captures(&mut self, node: NodeId) {
        for diagonal in Diagonal::all() {
            if self.piece.is_crowned() {
                self.add_king_captures(node, diagonal);
            } else {
                self.add_man_captures(node, diagonal);
            }
        }
    }

    /// A man jumps an adjacent enemy onto the free square right behind it.
    fn add_man_captures(&mut self, node: NodeId, diagonal: Diagonal) {
        let dims = self.board.dims();
        let from = self.nodes[node].position;

        let Some(victim) = from
            .step(diagonal, 1, dims)
            .and_then(|over| self.enemy_at(over))
        else {
            return;
        };
        let Some(landing) = from.step(diagonal, 2, dims) else {
            return;
        };

        if self.is_free(landing) && !self.has_captured(node, victim) {
            let child = self.add_node(node, landing, Some(victim));
            self.add_captures(child);
        }
    }

    /// A king slides over free squares, jumps the first enemy it meets,
    /// and may land on any free square behind it.
    fn add_king_captures(&mut self, node: NodeId, diagonal: Diagonal) {
        let mut ray = self.nodes[node].position.ray(diagonal, self.board.dims());

        let Some(blocker) = ray.find(|&position| !self.is_free(position)) else {
            return;
        };
        let Some(victim) = self.enemy_at(blocker) else {
            return;
        };
        // A piece jumped earlier in this chain stays on the board and blocks the diagonal
        if self.has_captured(node, victim) {
            return;
        }

        let landings = ray
            .take_while(|&position| self.is_free(position))
            .collect::<Vec<_>>();

        for landing in landings {
            let child = self.add_node(node, landing, Some(victim));
            self.add_captures(child);
        }
    }

    /// A man steps one square forward onto a free square.
    fn add_man_steps(&mut self) {
        let dims = self.board.dims();
        for diagonal in self.piece.side().forward_diagonals() {
            if let Some(to) = self.origin.step(diagonal, 1, dims) {
                if self.is_free(to) {
                    self.add_node(MoveTree::ROOT, to, None);
                }
            }
        }
    }

    /// A king slides any number of free squares along each diagonal.
    fn add_king_steps(&mut self) {
        let dims = self.board.dims();
        for diagonal in Diagonal::all() {
            let targets = self
                .origin
                .ray(diagonal, dims)
                .take_while(|&position| self.is_free(position))
                .collect::<Vec<_>>();

            for to in targets {
                self.add_node(MoveTree::ROOT, to, None);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Dimensions, Side};

    fn pos(n: u16) -> Position {
        Position::from_number(n, Dimensions::INTERNATIONAL).unwrap()
    }

    fn board_with(pieces: &[(Side, u16, bool)]) -> (Board, Vec<PieceId>) {
        let mut board = Board::empty(Dimensions::INTERNATIONAL);
        let ids = pieces
            .iter()
            .map(|&(side, n, crowned)| {
                let piece = if crowned {
                    Piece::new_crowned(side, pos(n))
                } else {
                    Piece::new(side, pos(n))
                };
                board.add_piece(piece).unwrap()
            })
            .collect();
        (board, ids)
    }

    fn chain_strings(tree: &MoveTree) -> Vec<String> {
        let mut chains = tree.chains().iter().map(|c| c.to_string()).collect::<Vec<_>>();
        chains.sort();
        chains
    }

    #[test]
    fn test_man_steps_forward_only() {
        let (board, ids) = board_with(&[(Side::First, 28, false), (Side::Second, 13, false)]);
        assert_eq!(chain_strings(&MoveTree::build(&board, ids[0])), ["28-22", "28-23"]);
        assert_eq!(chain_strings(&MoveTree::build(&board, ids[1])), ["13-18", "13-19"]);
    }

    #[test]
    fn test_man_captures_backward() {
        let (board, ids) = board_with(&[(Side::First, 23, false), (Side::Second, 28, false)]);
        let tree = MoveTree::build(&board, ids[0]);
        let chains = chain_strings(&tree);
        assert!(chains.contains(&String::from("23x32")), "{chains:?}");
    }

    #[test]
    fn test_man_double_capture_is_one_deeper_path() {
        let (board, ids) = board_with(&[
            (Side::First, 32, false),
            (Side::Second, 28, false),
            (Side::Second, 19, false),
        ]);
        let tree = MoveTree::build(&board, ids[0]);
        let chains = tree.chains();
        let double = chains.iter().find(|c| c.capture_count() == 2).unwrap();
        assert_eq!(double.to_string(), "32x23x14");
        assert_eq!(double.captured().collect::<Vec<_>>(), [ids[1], ids[2]]);
        assert_eq!(tree.ancestors(tree.len() - 1).last(), Some(MoveTree::ROOT));
    }

    #[test]
    fn test_king_slides_to_every_free_square() {
        // 46 sits in the corner; its only diagonal runs 41, 37, 32, ...
        let (board, ids) = board_with(&[(Side::First, 46, true), (Side::First, 28, false)]);
        let tree = MoveTree::build(&board, ids[0]);
        assert_eq!(chain_strings(&tree), ["46-32", "46-37", "46-41"]);
    }

    #[test]
    fn test_king_capture_lands_anywhere_behind() {
        let (board, ids) = board_with(&[(Side::First, 46, true), (Side::Second, 32, false)]);
        let tree = MoveTree::build(&board, ids[0]);
        let captures = tree
            .chains()
            .iter()
            .filter(|c| c.capture_count() == 1)
            .map(|c| c.destination().number())
            .collect::<Vec<_>>();
        assert_eq!(captures, [28, 23, 19, 14, 10, 5]);
    }

    #[test]
    fn test_king_cannot_jump_two_in_a_row() {
        let (board, ids) = board_with(&[
            (Side::First, 46, true),
            (Side::Second, 37, false),
            (Side::Second, 32, false),
        ]);
        let tree = MoveTree::build(&board, ids[0]);
        assert!(tree.chains().iter().all(|c| c.capture_count() == 0));
    }

    #[test]
    fn test_no_piece_is_captured_twice() {
        // Four enemies around a king let it circle back towards the first victim
        let (board, ids) = board_with(&[
            (Side::First, 28, true),
            (Side::Second, 22, false),
            (Side::Second, 23, false),
            (Side::Second, 33, false),
            (Side::Second, 32, false),
        ]);
        let tree = MoveTree::build(&board, ids[0]);
        assert!(!tree.chains().is_empty());
        for chain in tree.chains() {
            let mut captured = chain.captured().collect::<Vec<_>>();
            let total = captured.len();
            captured.sort();
            captured.dedup();
            assert_eq!(captured.len(), total, "{chain} captures a piece twice");
        }
    }

    #[test]
    fn test_stuck_piece_yields_zero_move_chain() {
        let (board, ids) = board_with(&[(Side::First, 46, false), (Side::First, 41, false)]);
        let tree = MoveTree::build(&board, ids[0]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.chains().len(), 1);
        assert!(tree.chains()[0].is_empty());
    }

    #[test]
    fn test_captured_piece_yields_empty_tree() {
        let (mut board, ids) = board_with(&[(Side::First, 32, false)]);
        board.capture_piece(ids[0]);
        let tree = MoveTree::build(&board, ids[0]);
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert!(tree.chains().is_empty());
    }

    #[test]
    fn test_chains_are_memoized() {
        let board = Board::default();
        let id = board.occupant(pos(31)).unwrap();
        let tree = MoveTree::build(&board, id);
        let first = tree.chains().as_ptr();
        assert_eq!(first, tree.chains().as_ptr());
    }
}
