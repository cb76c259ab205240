//! End-to-end conversion tests over a representative chat feature model.

use uvlhub_fm::{parser, writers};

const CHAT_UVL: &str = concat!(
    "features\n",
    "    Chat\n",
    "        mandatory\n",
    "            Connection\n",
    "                alternative\n",
    "                    \"Peer 2 Peer\"\n",
    "                    Server\n",
    "            Messages\n",
    "                or\n",
    "                    Text\n",
    "                    Video\n",
    "                    Audio\n",
    "        optional\n",
    "            \"Data Storage\"\n",
    "            \"Media Player\"\n",
    "\n",
    "constraints\n",
    "    Server => \"Data Storage\"\n",
    "    Video | Audio => \"Media Player\"\n",
);

const CHAT_DIMACS: &str = concat!(
    "p cnf 10 18\n",
    "c 1 Chat\n",
    "c 2 Connection\n",
    "c 3 \"Peer 2 Peer\"\n",
    "c 4 Server\n",
    "c 5 Messages\n",
    "c 6 Text\n",
    "c 7 Video\n",
    "c 8 Audio\n",
    "c 9 \"Data Storage\"\n",
    "c 10 \"Media Player\"\n",
    "1 0\n",
    "-1 2 0\n",
    "-2 1 0\n",
    "-2 3 4 0\n",
    "-3 -4 0\n",
    "-3 2 0\n",
    "-4 2 0\n",
    "-1 5 0\n",
    "-5 1 0\n",
    "-5 6 7 8 0\n",
    "-6 5 0\n",
    "-7 5 0\n",
    "-8 5 0\n",
    "-9 1 0\n",
    "-10 1 0\n",
    "-4 9 0\n",
    "-7 10 0\n",
    "-8 10 0\n",
);

const CHAT_SPLOT: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
    "<feature_model name=\"Chat\">\n",
    "<feature_tree>\n",
    ":r Chat (Chat)\n",
    "\t:m Connection (Connection)\n",
    "\t\t:g [1,1]\n",
    "\t\t\t: \"Peer 2 Peer\" (\"Peer 2 Peer\")\n",
    "\t\t\t: Server (Server)\n",
    "\t:m Messages (Messages)\n",
    "\t\t:g [1,3]\n",
    "\t\t\t: Text (Text)\n",
    "\t\t\t: Video (Video)\n",
    "\t\t\t: Audio (Audio)\n",
    "\t:o \"Data Storage\" (\"Data Storage\")\n",
    "\t:o \"Media Player\" (\"Media Player\")\n",
    "</feature_tree>\n",
    "<constraints>\n",
    "\tC1: ~Server or \"Data Storage\"\n",
    "\tC2: ~Video or \"Media Player\"\n",
    "\tC3: ~Audio or \"Media Player\"\n",
    "</constraints>\n",
    "</feature_model>\n",
);

#[test]
fn test_chat_model_to_dimacs() {
    let model = parser::parse(CHAT_UVL).unwrap();
    assert_eq!(writers::dimacs::to_string(&model).unwrap(), CHAT_DIMACS);
}

#[test]
fn test_chat_model_to_splot() {
    let model = parser::parse(CHAT_UVL).unwrap();
    assert_eq!(writers::splot::to_string(&model).unwrap(), CHAT_SPLOT);
}

#[test]
fn test_chat_model_to_glencoe_is_valid_json() {
    let model = parser::parse(CHAT_UVL).unwrap();
    let out = writers::glencoe::to_string(&model).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["root"]["id"], "Chat");
}

#[test]
fn test_write_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let model = parser::parse(CHAT_UVL).unwrap();

    let cnf_path = dir.path().join("chat.uvl_cnf.txt");
    writers::dimacs::write_to(&model, &cnf_path).unwrap();
    assert_eq!(std::fs::read_to_string(&cnf_path).unwrap(), CHAT_DIMACS);

    let splot_path = dir.path().join("chat.uvl_splot.txt");
    writers::splot::write_to(&model, &splot_path).unwrap();
    assert_eq!(std::fs::read_to_string(&splot_path).unwrap(), CHAT_SPLOT);

    let glencoe_path = dir.path().join("chat.uvl_glencoe.txt");
    writers::glencoe::write_to(&model, &glencoe_path).unwrap();
    let raw = std::fs::read_to_string(&glencoe_path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
}

#[test]
fn test_read_model_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat.uvl");
    std::fs::write(&path, CHAT_UVL).unwrap();
    let model = parser::read_model(&path).unwrap();
    assert_eq!(model.root.name, "Chat");
    assert_eq!(model.feature_count(), 10);
}
