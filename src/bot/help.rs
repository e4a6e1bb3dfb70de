//! Help pages. The third page depends on the reader's role.

use crate::room::Role;

pub const HELP_PAGES: usize = 3;

pub fn pages(role: Role, emote_count: usize, prefix: char) -> [String; HELP_PAGES] {
    let p = prefix;
    let basics = format!(
        "🤖 **Help (1/3)** 🤖\n\
         **Emotes:** 1-{n} (e.g., 1, 25, {n})\n\
         **Teleport:** f1-f10, vip (mods)\n\
         **Loop:** {p}loop <number>, {p}stop\n\
         **List:** {p}emotes",
        n = emote_count,
        p = p,
    );

    let fun = format!(
        "🤖 **Help (2/3)** 🤖\n\
         **Fun:** {p}rizz @user, {p}ship @u1 @u2\n\
         **More:** {p}roast @user, {p}iq @user\n\
         **Meters:** {p}lovepercentage @user, {p}hatepercentage @user\n\
         **Other:** {p}joke, {p}straightmeter\n\
         **Spam:** {p}spam <msg> <num>",
        p = p,
    );

    let staff = match role {
        Role::Member => "🤖 **Help (3/3)** 🤖\n**Info:** Basic commands for all users".to_string(),
        Role::Moderator => format!(
            "🤖 **Help (3/3)** 🤖\n\
             **Mod:** number @user, {p}summon @user\n\
             **Movement:** {p}goto @user, {p}tele @user <slot>\n\
             **Teleports:** {p}setf1-f10, {p}setvip\n\
             **Broadcast:** {p}repeat [secs] <msg>, {p}off\n\
             **Staff:** {p}modlist",
            p = p,
        ),
        Role::SuperAdmin => format!(
            "🤖 **Help (3/3)** 🤖\n\
             **Mod:** number @user, {p}summon @user\n\
             **Movement:** {p}goto @user, {p}tele @user <slot>\n\
             **Teleports:** {p}setf1-f10, {p}setvip\n\
             **Broadcast:** {p}repeat [secs] <msg>, {p}off\n\
             **Admin:** {p}addmod @user, {p}delmod @user, {p}kick @user\n\
             **Staff:** {p}modlist",
            p = p,
        ),
    };

    [basics, fun, staff]
}
