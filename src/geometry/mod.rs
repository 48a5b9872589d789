//! Stateless 2D vector and line operations

pub mod bounds;
pub mod lines;
pub mod vectors;

pub use bounds::Bounds;
pub use lines::{
    Crossing, DEFAULT_TOLERATED_ANGLE, crossing_point_for_two_lines, get_a_and_b_for_line,
    get_a_point_on_a_line_closest_to_point, is_point_roughly_on_the_line,
};
pub use vectors::{
    get_angle, get_vector_length, normalize_vector, perpendicular_normalized_vector_to_straight_line,
    perpendicular_vector, vector,
};
