use glam::DVec3;

use crate::forward::ForwardKernel;
use crate::types::{Aabb, GCC_TO_KG_M3, GRAVITATIONAL_CONSTANT, SI_TO_MGAL};

/// Vertical gravity of a uniform right rectangular prism.
///
/// Closed-form solution summed over the eight prism corners, with depths measured
/// downward from the receiver. Density in g/cc, response in mGal, positive when
/// excess mass lies below the receiver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrismGravity;

impl PrismGravity {
    const SCALE: f64 = GRAVITATIONAL_CONSTANT * GCC_TO_KG_M3 * SI_TO_MGAL;
}

impl ForwardKernel for PrismGravity {
    fn response(&self, receiver: DVec3, cell: &Aabb) -> f64 {
        let xs = [cell.min.x - receiver.x, cell.max.x - receiver.x];
        let ys = [cell.min.y - receiver.y, cell.max.y - receiver.y];
        let zs = [receiver.z - cell.max.z, receiver.z - cell.min.z];

        let mut sum = 0.0;
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                for (k, &z) in zs.iter().enumerate() {
                    let sign = if (i + j + k) % 2 == 0 { 1.0 } else { -1.0 };
                    sum += sign * corner_term(x, y, z);
                }
            }
        }
        -Self::SCALE * sum
    }
}

fn corner_term(x: f64, y: f64, z: f64) -> f64 {
    let r = (x * x + y * y + z * z).sqrt();
    let mut term = 0.0;
    if z != 0.0 {
        term += z * (x * y / (z * r)).atan();
    }
    // x ln(r + y) -> 0 as x -> 0; r + y only vanishes when x = z = 0.
    if x != 0.0 && r + y > 0.0 {
        term -= x * (r + y).ln();
    }
    if y != 0.0 && r + x > 0.0 {
        term -= y * (r + x).ln();
    }
    term
}
