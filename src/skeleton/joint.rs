//! Fixed 21-joint hand topology.
//!
//! Index layout follows the common hand landmark model: the wrist, then four
//! joints per digit from the base outwards (thumb, index, middle, ring, pinky).

/// Number of joints in one hand.
pub const JOINT_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Leaf joints of the topology, thumb first.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Fingertips that can pinch against the thumb, in tie-break order.
pub const PINCH_FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Joint each joint orients towards: the next joint outwards along its digit.
///
/// The wrist aims along the thumb chain. Fingertips have no child.
pub const CHILD: [Option<usize>; JOINT_COUNT] = [
    Some(THUMB_CMC),
    Some(THUMB_MCP),
    Some(THUMB_IP),
    Some(THUMB_TIP),
    None,
    Some(INDEX_PIP),
    Some(INDEX_DIP),
    Some(INDEX_TIP),
    None,
    Some(MIDDLE_PIP),
    Some(MIDDLE_DIP),
    Some(MIDDLE_TIP),
    None,
    Some(RING_PIP),
    Some(RING_DIP),
    Some(RING_TIP),
    None,
    Some(PINKY_PIP),
    Some(PINKY_DIP),
    Some(PINKY_TIP),
    None,
];

/// Joint each joint hangs from. The wrist is the root.
pub const PARENT: [Option<usize>; JOINT_COUNT] = [
    None,
    Some(WRIST),
    Some(THUMB_CMC),
    Some(THUMB_MCP),
    Some(THUMB_IP),
    Some(WRIST),
    Some(INDEX_MCP),
    Some(INDEX_PIP),
    Some(INDEX_DIP),
    Some(WRIST),
    Some(MIDDLE_MCP),
    Some(MIDDLE_PIP),
    Some(MIDDLE_DIP),
    Some(WRIST),
    Some(RING_MCP),
    Some(RING_PIP),
    Some(RING_DIP),
    Some(WRIST),
    Some(PINKY_MCP),
    Some(PINKY_PIP),
    Some(PINKY_DIP),
];

/// Returns `true` if `joint` is a fingertip leaf.
#[must_use]
pub fn is_fingertip(joint: usize) -> bool {
    FINGERTIPS.contains(&joint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingertips_are_exactly_the_leaves() {
        for joint in 0..JOINT_COUNT {
            assert_eq!(CHILD[joint].is_none(), is_fingertip(joint), "joint {joint}");
        }
    }

    #[test]
    fn child_and_parent_tables_agree() {
        for (joint, child) in CHILD.iter().enumerate() {
            if let Some(child) = *child {
                assert_eq!(PARENT[child], Some(joint), "child {child} of {joint}");
            }
        }
    }

    #[test]
    fn every_digit_hangs_from_the_wrist() {
        let roots: Vec<usize> = (0..JOINT_COUNT)
            .filter(|&j| PARENT[j] == Some(WRIST))
            .collect();
        assert_eq!(roots, vec![THUMB_CMC, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP]);
    }
}
