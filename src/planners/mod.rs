pub mod best_first;
