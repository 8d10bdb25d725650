use game_core::{Phraseset, Room};

/// A known phraseset large enough for several turns.
pub fn test_phraseset() -> Phraseset {
    Phraseset::from_list(
        "the cat sat on the mat\n\
         red sky at night\n\
         out of the blue\n\
         piece of cake\n\
         once in a blue moon\n\
         a stitch in time\n\
         barking up the wrong tree\n\
         the early bird",
    )
}

/// Creates a room whose roster is `names` in join order; the first name
/// is the creator and therefore the opening guesser.
pub fn room_with_players(names: &[&str]) -> Room {
    let mut names = names.iter();
    let creator = names.next().expect("at least one player");
    let mut room = Room::new(creator, format!("secret-{creator}"), &test_phraseset());
    for name in names {
        room.join(name, format!("secret-{name}"));
    }
    room
}
