//! Reply texts sent back to chat.

pub fn channel_restricted(mention: &str) -> String {
    format!("{mention} Please issue commands in bot channels!")
}

pub fn invalid_format(mention: &str) -> String {
    format!("{mention} Incorrect command format!")
}

pub fn invalid_target(mention: &str) -> String {
    format!("{mention} Match target invalid!")
}

/// `"<filled>/<capacity> filled in <queue>"`
pub fn progress(filled: usize, capacity: usize, queue: &str) -> String {
    format!("{filled}/{capacity} filled in {queue}")
}

/// `"<queue>: <m1> <m2> ..."`
pub fn group_formed(queue: &str, members: &[String]) -> String {
    format!("{queue}: {}", members.join(" "))
}

/// Usage text listing one `match` command per queue.
pub fn help<'a>(prefix: char, queues: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = String::from(
        "\nFind Study Partners by Preference (Beta and sorry for the primitiveness)\n\
         Currently supported preference: 1. choosing between 2 or 3 people and 2. whether to \
         use cam/screenshare\n\
         Please use one of the following commands to join the respective queues:\n\n",
    );
    for queue in queues {
        text.push_str(&format!("{prefix}match {queue}\n"));
    }
    text
}
