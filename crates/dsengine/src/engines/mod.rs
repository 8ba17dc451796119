/// Binary search tree with search-path tracing.
pub mod bst;
/// Weighted graph with BFS, DFS and Dijkstra.
pub mod graph;
/// Chaining and linear-probing hash tables.
pub mod hash_table;
/// Huffman coding.
pub mod huffman;
/// Singly and doubly linked lists.
pub mod linked_list;
/// Sorted-array and binary-heap priority queues.
pub mod priority_queue;
/// Bounded FIFO queue.
pub mod queue;
/// Bounded LIFO stack.
pub mod stack;
/// Travelling-salesman solvers.
pub mod tsp;
